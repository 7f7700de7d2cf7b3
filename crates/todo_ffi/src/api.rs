//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the todo store intents to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One process-wide store; every call holds its lock for the whole
//!   write-then-refresh sequence.
//! - Mutating calls return the refreshed list so the UI never re-reads
//!   storage on its own.

use log::warn;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_store,
    ping as ping_inner, EditMode, SqliteTodoStore, Todo, TodoId,
};

const DB_PATH_ENV: &str = "TODO_APP_DB_PATH";
const DB_FILE_NAME: &str = "todo_app.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE: OnceCell<Mutex<SqliteTodoStore>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Row shown by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// `open|done`.
    pub status: String,
}

/// Current list snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub ok: bool,
    pub items: Vec<TodoItem>,
    /// Increments on every successful refresh.
    pub revision: u64,
    pub message: String,
}

/// Result of one add/select/update/delete/submit intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Id of the affected todo, when known.
    pub todo_id: Option<i64>,
    /// Refreshed list after the operation (last good snapshot on failure).
    pub items: Vec<TodoItem>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

/// Loads every todo from storage and publishes the refreshed snapshot.
///
/// The UI calls this once when the list is first shown.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_list() -> TodoListResponse {
    let result = with_store(|store| {
        store
            .refresh()
            .map(|_| ())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok((items, revision, ())) => TodoListResponse {
            ok: true,
            message: format!("{} todo(s).", items.len()),
            items,
            revision,
        },
        Err((items, revision, err)) => TodoListResponse {
            ok: false,
            items,
            revision,
            message: format!("todo_list failed: {err}"),
        },
    }
}

/// Adds a todo. An empty title is accepted.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(title: String, description: String) -> TodoActionResponse {
    action("todo_add", "Todo created.", |store| {
        store
            .add(title, description)
            .map(Some)
            .map_err(|err| err.to_string())
    })
}

/// Marks the todo with `id` as the target of the next `todo_update`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_select(id: i64) -> TodoActionResponse {
    action("todo_select", "Todo selected.", |store| {
        let todo = find_in_snapshot(store, id)?;
        store.select(&todo);
        Ok(Some(todo.id))
    })
}

/// Whether a todo is currently selected for edit.
///
/// Returns `false` when the store cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_is_editing() -> bool {
    with_store(|store| Ok::<_, String>(store.is_editing()))
        .map(|(_, _, editing)| editing)
        .unwrap_or(false)
}

/// Id of the todo an edit form opened now would revise, `None` for create.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_editing_id() -> Option<i64> {
    with_store(|store| {
        Ok::<_, String>(match store.edit_mode() {
            EditMode::Create => None,
            EditMode::Edit(todo) => Some(todo.id),
        })
    })
    .ok()
    .and_then(|(_, _, id)| id)
}

/// Revises the selected todo's title and description.
///
/// Fails when no todo was selected with `todo_select`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_update(title: String, description: String) -> TodoActionResponse {
    action("todo_update", "Todo updated.", |store| {
        store
            .update(title, description)
            .map_err(|err| err.to_string())?;
        Ok(current_selection_id(store))
    })
}

/// Deletes the todo with `id` from the current list.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(id: i64) -> TodoActionResponse {
    action("todo_delete", "Todo deleted.", |store| {
        let todo = find_in_snapshot(store, id)?;
        store.delete(&todo).map_err(|err| err.to_string())?;
        Ok(Some(todo.id))
    })
}

/// Submits the edit form with an explicit mode.
///
/// - `editing_id = None`: creates a new todo.
/// - `editing_id = Some(id)`: revises that todo, which must be in the
///   current list.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_submit(
    editing_id: Option<i64>,
    title: String,
    description: String,
) -> TodoActionResponse {
    action("todo_submit", "Todo saved.", |store| {
        let mode = match editing_id {
            None => EditMode::Create,
            Some(id) => EditMode::Edit(find_in_snapshot(store, id)?),
        };
        store
            .submit(mode, title, description)
            .map(Some)
            .map_err(|err| err.to_string())
    })
}

fn action(
    name: &'static str,
    success_message: &'static str,
    f: impl FnOnce(&mut SqliteTodoStore) -> Result<Option<TodoId>, String>,
) -> TodoActionResponse {
    match with_store(f) {
        Ok((items, _, todo_id)) => TodoActionResponse {
            ok: true,
            todo_id,
            items,
            message: success_message.to_string(),
        },
        Err((items, _, err)) => {
            warn!("event=ffi_call module=ffi status=error call={name}");
            TodoActionResponse {
                ok: false,
                todo_id: None,
                items,
                message: format!("{name} failed: {err}"),
            }
        }
    }
}

/// Runs `f` under the store lock and captures the resulting snapshot.
///
/// Both arms carry `(items, revision, ...)` so callers can always render
/// the last good list.
fn with_store<T>(
    f: impl FnOnce(&mut SqliteTodoStore) -> Result<T, String>,
) -> Result<(Vec<TodoItem>, u64, T), (Vec<TodoItem>, u64, String)> {
    let cell = STORE
        .get_or_try_init(|| {
            open_store(resolve_db_path())
                .map(Mutex::new)
                .map_err(|err| format!("todo store open failed: {err}"))
        })
        .map_err(|err| (Vec::new(), 0, err))?;
    let mut store = cell
        .lock()
        .map_err(|_| (Vec::new(), 0, "todo store lock poisoned".to_string()))?;

    let outcome = f(&mut *store);
    let items = store.todos().iter().map(to_todo_item).collect();
    let revision = store.revision();
    match outcome {
        Ok(value) => Ok((items, revision, value)),
        Err(err) => Err((items, revision, err)),
    }
}

fn find_in_snapshot(store: &SqliteTodoStore, id: i64) -> Result<Todo, String> {
    store
        .todos()
        .iter()
        .find(|todo| todo.id == id)
        .cloned()
        .ok_or_else(|| format!("todo {id} is not in the current list"))
}

fn current_selection_id(store: &SqliteTodoStore) -> Option<TodoId> {
    match store.edit_mode() {
        EditMode::Create => None,
        EditMode::Edit(todo) => Some(todo.id),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn to_todo_item(todo: &Todo) -> TodoItem {
    TodoItem {
        id: todo.id,
        title: todo.title.clone(),
        description: todo.description.clone(),
        status: todo.status.as_str().to_string(),
    }
}
