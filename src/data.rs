use rusqlite::Connection;
use serde::Deserialize;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub type DBConnection = Arc<Mutex<Connection>>;

const DEFAULT_DATABASE: &str = "todoApplication.db";

/// Application settings read from the same figment Rocket uses
/// (`Rocket.toml` and `ROCKET_*` variables).
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TodoConfig {
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}
