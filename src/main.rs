use rocket::{catchers, routes, Build, Rocket};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use std::error::Error;
use std::sync::{Arc, Mutex};

mod data;
mod internal_error;
mod todo;

#[cfg(test)]
mod tests;

use data::{DBConnection, TodoConfig};
use todo::endpoints;

pub fn build_rocket(connection: Connection) -> Rocket<Build> {
    let connection: DBConnection = Arc::new(Mutex::new(connection));

    rocket::build()
        .manage(connection)
        .mount(
            "/",
            routes![
                endpoints::get_todos,
                endpoints::get_todo,
                endpoints::get_agenda,
                endpoints::add_todo,
                endpoints::update_todo,
                endpoints::delete_todo,
            ],
        )
        .register(
            "/",
            catchers![
                endpoints::not_found,
                endpoints::unprocessable,
                endpoints::internal_error,
            ],
        )
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: TodoConfig = rocket::Config::figment().extract()?;

    let connection = Connection::open(&config.database).map_err(|e| {
        tracing::error!(database = %config.database.display(), "DB Error: {}", e);
        e
    })?;
    todo::helpers::create_todo_table(&connection)?;
    tracing::info!(database = %config.database.display(), "database ready");

    build_rocket(connection).launch().await?;

    Ok(())
}
