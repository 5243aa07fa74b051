use chrono::NaiveDate;
use rocket::data::{self, Data, FromData};
use rocket::http;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};
use rocket::serde::json::{Json, Value};

use super::data::*;
use super::date::normalize_due_date;
use super::error::{TodoError, TodoResult};

fn validate_optional<T: FieldValue>(value: Option<&str>) -> TodoResult<Option<T>> {
    value.map(T::validate).transpose()
}

fn normalize_optional(value: Option<&str>) -> TodoResult<Option<NaiveDate>> {
    value.map(normalize_due_date).transpose()
}

/// A present JSON value that is not a string can never be an allowed value.
fn validate_json<T: FieldValue>(value: Option<&Value>) -> TodoResult<Option<T>> {
    value
        .map(|value| match value {
            Value::String(text) => T::validate(text),
            _ => Err(TodoError::InvalidField(T::FIELD)),
        })
        .transpose()
}

fn normalize_json(value: Option<&Value>) -> TodoResult<Option<NaiveDate>> {
    value
        .map(|value| match value {
            Value::String(text) => normalize_due_date(text),
            _ => Err(TodoError::InvalidDate),
        })
        .transpose()
}

/// Returns the only value given for `name`. A repeated key is answered with
/// `repeated`.
fn single_value<'a>(
    pairs: &'a [(String, String)],
    name: &str,
    repeated: TodoError,
) -> TodoResult<Option<&'a str>> {
    let mut values = pairs
        .iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.as_str());

    let first = values.next();
    if values.next().is_some() {
        return Err(repeated);
    }

    Ok(first)
}

impl TodoQuery {
    /// Checks priority, status, category, date and search_q in that order;
    /// the first bad field decides the error.
    pub fn from_pairs(pairs: &[(String, String)]) -> TodoResult<TodoQuery> {
        Ok(TodoQuery {
            priority: validate_optional(single_value(
                pairs,
                "priority",
                TodoError::InvalidField(TodoField::Priority),
            )?)?,
            status: validate_optional(single_value(
                pairs,
                "status",
                TodoError::InvalidField(TodoField::Status),
            )?)?,
            category: validate_optional(single_value(
                pairs,
                "category",
                TodoError::InvalidField(TodoField::Category),
            )?)?,
            date: normalize_optional(single_value(pairs, "date", TodoError::InvalidDate)?)?,
            search_q: single_value(pairs, "search_q", TodoError::InvalidSearch)?
                .map(str::to_string),
        })
    }
}

impl TryFrom<RawTodoBody> for TodoBody {
    type Error = TodoError;

    fn try_from(raw: RawTodoBody) -> TodoResult<TodoBody> {
        Ok(TodoBody {
            priority: validate_json(raw.priority.as_ref())?,
            status: validate_json(raw.status.as_ref())?,
            category: validate_json(raw.category.as_ref())?,
            due_date: normalize_json(raw.due_date.as_ref())?,
            todo: raw.todo,
            id: raw.id,
        })
    }
}

fn query_pairs(request: &Request<'_>) -> Vec<(String, String)> {
    match request.uri().query() {
        Some(query) => query
            .segments()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
        None => vec![],
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for TodoQuery {
    type Error = TodoError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match TodoQuery::from_pairs(&query_pairs(request)) {
            Ok(query) => Outcome::Success(query),
            Err(e) => Outcome::Error((http::Status::BadRequest, e)),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromData<'r> for TodoBody {
    type Error = TodoError;

    async fn from_data(request: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        match Json::<RawTodoBody>::from_data(request, data).await {
            Outcome::Success(Json(raw)) => match TodoBody::try_from(raw) {
                Ok(body) => Outcome::Success(body),
                Err(e) => Outcome::Error((http::Status::BadRequest, e)),
            },
            Outcome::Error((_, e)) => Outcome::Error((
                http::Status::BadRequest,
                TodoError::MalformedBody(e.to_string()),
            )),
            Outcome::Forward(forward) => Outcome::Forward(forward),
        }
    }
}
