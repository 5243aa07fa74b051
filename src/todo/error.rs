use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::Request;
use thiserror::Error;

use crate::internal_error::InternalError;

use super::data::{TodoField, TodoID};

/// Everything a todo route can answer with besides success. Bodies are
/// always plain text.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Invalid Todo {0}")]
    InvalidField(TodoField),

    #[error("Invalid Due Date")]
    InvalidDate,

    #[error("Invalid Search Query")]
    InvalidSearch,

    #[error("Missing Todo {0}")]
    MissingField(TodoField),

    #[error("Invalid Request Body")]
    MalformedBody(String),

    #[error("Nothing To Update")]
    NothingToUpdate,

    #[error("Todo Not Found")]
    NotFound(TodoID),

    #[error("Todo Already Exists")]
    AlreadyExists(TodoID),

    #[error("Internal Server Error")]
    Internal(#[from] InternalError),
}

impl TodoError {
    pub fn status(&self) -> Status {
        match self {
            TodoError::InvalidField(_)
            | TodoError::InvalidDate
            | TodoError::InvalidSearch
            | TodoError::MissingField(_)
            | TodoError::MalformedBody(_)
            | TodoError::NothingToUpdate => Status::BadRequest,
            TodoError::NotFound(_) => Status::NotFound,
            TodoError::AlreadyExists(_) => Status::Conflict,
            TodoError::Internal(_) => Status::InternalServerError,
        }
    }
}

impl From<rusqlite::Error> for TodoError {
    fn from(e: rusqlite::Error) -> TodoError {
        TodoError::Internal(InternalError::from(e))
    }
}

impl<'r> Responder<'r, 'static> for TodoError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        match &self {
            TodoError::Internal(e) => {
                tracing::error!(method = %request.method(), uri = %request.uri(), "{}", e)
            }
            TodoError::MalformedBody(detail) => {
                tracing::debug!(uri = %request.uri(), detail = %detail, "rejected request body")
            }
            other => tracing::debug!(uri = %request.uri(), "rejected request: {}", other),
        }

        (self.status(), self.to_string()).respond_to(request)
    }
}

pub type TodoResult<T> = Result<T, TodoError>;
