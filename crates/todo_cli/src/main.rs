//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todo_core` linkage without a Flutter host.
//! - Run one add/edit/delete pass against an in-memory database.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;
use todo_core::db::open_db_in_memory;
use todo_core::{RepoError, SqliteTodoRepository, StoreError, Todo, TodoRepository, TodoStore};

fn main() -> ExitCode {
    println!("todo_core ping={}", todo_core::ping());
    println!("todo_core version={}", todo_core::core_version());

    match run_smoke() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("smoke failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_smoke() -> Result<(), StoreError> {
    let conn = open_db_in_memory().map_err(|err| StoreError::Repo(err.into()))?;
    let mut store = TodoStore::new(SqliteTodoRepository::try_new(conn)?);
    store.subscribe(|todos| println!("  list -> {}", render(todos)));

    store.refresh()?;
    let id = store.add("Buy milk", "2%")?;
    let created = store
        .repository()
        .get_todo(id)?
        .ok_or(RepoError::NotFound(id))?;
    store.select(&created);
    store.update("Buy milk", "Whole")?;
    store.delete(&created)?;
    Ok(())
}

fn render(todos: &[Todo]) -> String {
    let rows = todos
        .iter()
        .map(|todo| {
            format!(
                "#{} {} ({}) [{}]",
                todo.id,
                todo.title,
                todo.description,
                todo.status.as_str()
            )
        })
        .collect::<Vec<_>>();
    format!("[{}]", rows.join(", "))
}
