use sqlx::SqlitePool;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub env: Config,
}

impl AppState {
    pub fn new(db: SqlitePool, env: Config) -> Self {
        Self { db, env }
    }
}
