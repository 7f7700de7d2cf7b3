//! Core logic for the to-do list app.
//! This crate is the single source of truth for todo invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{Todo, TodoId, TodoStatus, UNSAVED_TODO_ID};
pub use repo::todo_repo::{RepoError, RepoResult, SqliteTodoRepository, TodoRepository};
pub use service::todo_store::{
    EditMode, EditSelection, StoreError, StoreResult, SubscriptionId, TodoStore,
};

/// Store wired to the SQLite repository.
pub type SqliteTodoStore = TodoStore<SqliteTodoRepository>;

/// Opens (or creates) the database at `path` and returns an unloaded store.
pub fn open_store(path: impl AsRef<std::path::Path>) -> RepoResult<SqliteTodoStore> {
    let conn = db::open_db(path)?;
    Ok(TodoStore::new(SqliteTodoRepository::try_new(conn)?))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
