use rocket::serde::json::Json;
use rocket::{catch, delete, get, post, put, Request, State};

use crate::data::DBConnection;
use crate::internal_error::InternalError;

use super::data::*;
use super::error::{TodoError, TodoResult};
use super::helpers::*;

#[get("/todos")]
pub fn get_todos(
    query: Result<TodoQuery, TodoError>,
    db_connection: &State<DBConnection>,
) -> TodoResult<Json<Vec<Todo>>> {
    let filter = TodoFilter::listing(query?);
    let db_connection = db_connection.lock().map_err(InternalError::from)?;

    let todos = get_todos_from_db(&filter, &db_connection)?;

    Ok(Json(todos))
}

#[get("/todos/<todo_id>")]
pub fn get_todo(todo_id: TodoID, db_connection: &State<DBConnection>) -> TodoResult<Json<Todo>> {
    let db_connection = db_connection.lock().map_err(InternalError::from)?;

    get_todo_from_db(todo_id, &db_connection).map(Json)
}

#[get("/agenda")]
pub fn get_agenda(
    query: Result<TodoQuery, TodoError>,
    db_connection: &State<DBConnection>,
) -> TodoResult<Json<Vec<Todo>>> {
    let filter = TodoFilter::agenda(query?);
    let db_connection = db_connection.lock().map_err(InternalError::from)?;

    let todos = get_todos_from_db(&filter, &db_connection)?;

    Ok(Json(todos))
}

#[post("/todos", data = "<body>")]
pub fn add_todo(
    body: Result<TodoBody, TodoError>,
    db_connection: &State<DBConnection>,
) -> TodoResult<&'static str> {
    let todo = NewTodo::try_from(body?)?;
    let db_connection = db_connection.lock().map_err(InternalError::from)?;

    add_todo_to_db(&todo, &db_connection)?;
    tracing::info!(todo_id = todo.id, "todo added");

    Ok("Todo Successfully Added")
}

#[put("/todos/<todo_id>", data = "<body>")]
pub fn update_todo(
    todo_id: TodoID,
    body: Result<TodoBody, TodoError>,
    db_connection: &State<DBConnection>,
) -> TodoResult<&'static str> {
    let update = TodoUpdate::first_from(body?).ok_or(TodoError::NothingToUpdate)?;
    let db_connection = db_connection.lock().map_err(InternalError::from)?;

    update_todo_in_db(todo_id, &update, &db_connection)?;
    tracing::info!(todo_id, column = update.column(), "todo updated");

    Ok(update.confirmation())
}

#[delete("/todos/<todo_id>")]
pub fn delete_todo(
    todo_id: TodoID,
    db_connection: &State<DBConnection>,
) -> TodoResult<&'static str> {
    let db_connection = db_connection.lock().map_err(InternalError::from)?;

    delete_todo_from_db(todo_id, &db_connection)?;
    tracing::info!(todo_id, "todo deleted");

    Ok("Todo Deleted")
}

#[catch(404)]
pub fn not_found() -> &'static str {
    "Not Found"
}

#[catch(422)]
pub fn unprocessable(request: &Request) -> &'static str {
    tracing::debug!(uri = %request.uri(), "unprocessable request");
    "Invalid Request"
}

#[catch(500)]
pub fn internal_error() -> &'static str {
    "Internal Server Error"
}
