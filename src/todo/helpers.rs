use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row, ToSql};

use crate::internal_error::InternalResult;

use super::data::*;
use super::error::{TodoError, TodoResult};

const SELECT_TODOS: &str =
    "SELECT id, todo, priority, status, category, due_date FROM todo";

pub fn create_todo_table(db_connection: &Connection) -> InternalResult<()> {
    db_connection.execute(
        "CREATE TABLE IF NOT EXISTS todo (
            id INTEGER NOT NULL PRIMARY KEY,
            todo TEXT NOT NULL,
            priority TEXT NOT NULL,
            status TEXT NOT NULL,
            category TEXT NOT NULL,
            due_date TEXT
        )",
        [],
    )?;

    Ok(())
}

pub fn get_todo_from_row(row: &Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        todo: row.get(1)?,
        priority: row.get(2)?,
        status: row.get(3)?,
        category: row.get(4)?,
        due_date: row.get(5)?,
    })
}

/// Read filters for the todo table. Unset filters match every row.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TodoFilter {
    pub search_q: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub due_date: Option<chrono::NaiveDate>,
}

impl TodoFilter {
    /// Filters for `GET /todos/`. The query's date is validated upstream but
    /// does not narrow the listing.
    pub fn listing(query: TodoQuery) -> TodoFilter {
        TodoFilter {
            search_q: query.search_q,
            priority: query.priority,
            status: query.status,
            category: query.category,
            due_date: None,
        }
    }

    /// Filters for `GET /agenda/`.
    pub fn agenda(query: TodoQuery) -> TodoFilter {
        TodoFilter {
            due_date: query.date,
            ..Default::default()
        }
    }

    /// Builds the WHERE clause with positional placeholders and the values
    /// to bind to them, in order.
    pub fn to_sql(&self) -> (String, Vec<&dyn ToSql>) {
        let mut clauses: Vec<&str> = vec![];
        let mut values: Vec<&dyn ToSql> = vec![];

        if let Some(search_q) = &self.search_q {
            clauses.push("instr(todo, ?) > 0");
            values.push(search_q);
        }
        if let Some(priority) = &self.priority {
            clauses.push("priority = ?");
            values.push(priority);
        }
        if let Some(status) = &self.status {
            clauses.push("status = ?");
            values.push(status);
        }
        if let Some(category) = &self.category {
            clauses.push("category = ?");
            values.push(category);
        }
        if let Some(due_date) = &self.due_date {
            clauses.push("due_date = ?");
            values.push(due_date);
        }

        let sql = if clauses.is_empty() {
            SELECT_TODOS.to_string()
        } else {
            format!("{} WHERE {}", SELECT_TODOS, clauses.join(" AND "))
        };

        (sql, values)
    }
}

pub fn get_todos_from_db(
    filter: &TodoFilter,
    db_connection: &Connection,
) -> InternalResult<Vec<Todo>> {
    let (sql, values) = filter.to_sql();
    let mut statement = db_connection.prepare(&sql)?;

    let todos = statement
        .query_map(params_from_iter(values), get_todo_from_row)?
        .collect::<rusqlite::Result<Vec<Todo>>>()?;

    Ok(todos)
}

pub fn get_todo_from_db(todo_id: TodoID, db_connection: &Connection) -> TodoResult<Todo> {
    let todo = db_connection
        .query_row(
            &format!("{} WHERE id = (?1)", SELECT_TODOS),
            params![todo_id],
            get_todo_from_row,
        )
        .optional()?;

    todo.ok_or(TodoError::NotFound(todo_id))
}

pub fn add_todo_to_db(todo: &NewTodo, db_connection: &Connection) -> TodoResult<()> {
    let inserted = db_connection.execute(
        "INSERT INTO todo (id, todo, priority, status, category, due_date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            todo.id,
            todo.todo,
            todo.priority,
            todo.status,
            todo.category,
            todo.due_date
        ],
    );

    match inserted {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(TodoError::AlreadyExists(todo.id))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn update_todo_in_db(
    todo_id: TodoID,
    update: &TodoUpdate,
    db_connection: &Connection,
) -> TodoResult<()> {
    let changed = db_connection.execute(
        &format!("UPDATE todo SET {} = (?1) WHERE id = (?2)", update.column()),
        params![update.value(), todo_id],
    )?;

    if changed == 0 {
        return Err(TodoError::NotFound(todo_id));
    }

    Ok(())
}

pub fn delete_todo_from_db(todo_id: TodoID, db_connection: &Connection) -> InternalResult<()> {
    db_connection.execute("DELETE FROM todo WHERE id = (?1)", params![todo_id])?;

    Ok(())
}
