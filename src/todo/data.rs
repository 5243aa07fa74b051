use chrono::NaiveDate;
use rocket::serde::json::Value;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize};

use std::fmt;

use super::error::{TodoError, TodoResult};

pub type TodoID = i64;

/// Request fields that carry validation rules of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoField {
    Id,
    Todo,
    Priority,
    Status,
    Category,
    DueDate,
}

impl fmt::Display for TodoField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TodoField::Id => "Id",
            TodoField::Todo => "Todo",
            TodoField::Priority => "Priority",
            TodoField::Status => "Status",
            TodoField::Category => "Category",
            TodoField::DueDate => "Due Date",
        };
        f.write_str(name)
    }
}

/// An enumerated column whose values must come from a fixed set.
pub trait FieldValue: Sized + Copy + 'static {
    const FIELD: TodoField;
    const ALLOWED: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn validate(value: &str) -> TodoResult<Self> {
        Self::ALLOWED
            .iter()
            .copied()
            .find(|allowed| allowed.as_str() == value)
            .ok_or(TodoError::InvalidField(Self::FIELD))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl FieldValue for Priority {
    const FIELD: TodoField = TodoField::Priority;
    const ALLOWED: &'static [Self] = &[Priority::High, Priority::Medium, Priority::Low];

    fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    #[serde(rename = "TO DO")]
    ToDo,
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
}

impl FieldValue for Status {
    const FIELD: TodoField = TodoField::Status;
    const ALLOWED: &'static [Self] = &[Status::ToDo, Status::InProgress, Status::Done];

    fn as_str(&self) -> &'static str {
        match self {
            Status::ToDo => "TO DO",
            Status::InProgress => "IN PROGRESS",
            Status::Done => "DONE",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Work,
    Home,
    Learning,
}

impl FieldValue for Category {
    const FIELD: TodoField = TodoField::Category;
    const ALLOWED: &'static [Self] = &[Category::Work, Category::Home, Category::Learning];

    fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "WORK",
            Category::Home => "HOME",
            Category::Learning => "LEARNING",
        }
    }
}

fn field_value_from_sql<T: FieldValue>(value: ValueRef<'_>) -> FromSqlResult<T> {
    let text = value.as_str()?;
    T::validate(text).map_err(|_| {
        FromSqlError::Other(format!("unexpected {} value in database: {}", T::FIELD, text).into())
    })
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        field_value_from_sql(value)
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        field_value_from_sql(value)
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        field_value_from_sql(value)
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// A persisted row. `dueDate` serializes as `YYYY-MM-DD`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: TodoID,
    pub todo: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
    #[serde(rename = "dueDate")]
    pub due_date: Option<NaiveDate>,
}

/// Body of `POST /todos/` and `PUT /todos/<id>/` exactly as the client sent it.
/// Validated fields keep their raw JSON so a present `null` or number is told
/// apart from an absent key.
#[derive(Deserialize, Debug, Default)]
pub struct RawTodoBody {
    pub id: Option<TodoID>,
    pub todo: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Value>,
    #[serde(default, rename = "dueDate", deserialize_with = "present")]
    pub due_date: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A body that passed validation. Absent fields stay `None`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TodoBody {
    pub id: Option<TodoID>,
    pub todo: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub due_date: Option<NaiveDate>,
}

/// Query-string filters that passed validation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TodoQuery {
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub search_q: Option<String>,
    pub date: Option<NaiveDate>,
}

/// A complete row ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub id: TodoID,
    pub todo: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
    pub due_date: NaiveDate,
}

impl TryFrom<TodoBody> for NewTodo {
    type Error = TodoError;

    fn try_from(body: TodoBody) -> TodoResult<NewTodo> {
        Ok(NewTodo {
            id: body.id.ok_or(TodoError::MissingField(TodoField::Id))?,
            todo: body.todo.ok_or(TodoError::MissingField(TodoField::Todo))?,
            priority: body
                .priority
                .ok_or(TodoError::MissingField(TodoField::Priority))?,
            status: body.status.ok_or(TodoError::MissingField(TodoField::Status))?,
            category: body
                .category
                .ok_or(TodoError::MissingField(TodoField::Category))?,
            due_date: body
                .due_date
                .ok_or(TodoError::MissingField(TodoField::DueDate))?,
        })
    }
}

/// The single column change a `PUT` applies.
#[derive(Debug, Clone, PartialEq)]
pub enum TodoUpdate {
    Todo(String),
    Status(Status),
    Priority(Priority),
    Category(Category),
    DueDate(NaiveDate),
}

impl TodoUpdate {
    /// Picks the first present field in the order todo, status, priority,
    /// category, dueDate. Every other field in the body is ignored.
    pub fn first_from(body: TodoBody) -> Option<TodoUpdate> {
        let TodoBody {
            todo,
            status,
            priority,
            category,
            due_date,
            ..
        } = body;

        todo.map(TodoUpdate::Todo)
            .or_else(|| status.map(TodoUpdate::Status))
            .or_else(|| priority.map(TodoUpdate::Priority))
            .or_else(|| category.map(TodoUpdate::Category))
            .or_else(|| due_date.map(TodoUpdate::DueDate))
    }

    pub fn column(&self) -> &'static str {
        match self {
            TodoUpdate::Todo(_) => "todo",
            TodoUpdate::Status(_) => "status",
            TodoUpdate::Priority(_) => "priority",
            TodoUpdate::Category(_) => "category",
            TodoUpdate::DueDate(_) => "due_date",
        }
    }

    pub fn value(&self) -> &dyn ToSql {
        match self {
            TodoUpdate::Todo(todo) => todo,
            TodoUpdate::Status(status) => status,
            TodoUpdate::Priority(priority) => priority,
            TodoUpdate::Category(category) => category,
            TodoUpdate::DueDate(due_date) => due_date,
        }
    }

    pub fn confirmation(&self) -> &'static str {
        match self {
            TodoUpdate::Todo(_) => "Todo Updated",
            TodoUpdate::Status(_) => "Status Updated",
            TodoUpdate::Priority(_) => "Priority Updated",
            TodoUpdate::Category(_) => "Category Updated",
            TodoUpdate::DueDate(_) => "Due Date Updated",
        }
    }
}
