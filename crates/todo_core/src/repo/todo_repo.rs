//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/update/delete/list-all over the `todos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Ids are assigned by SQLite on insert; the draft id is ignored.
//! - `list_todos` returns rows in ascending id (insertion) order.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::todo::{Todo, TodoId, TodoStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT id, title, description, status FROM todos";
const TODOS_TABLE: &str = "todos";
const REQUIRED_TODO_COLUMNS: &[&str] = &["id", "title", "description", "status", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure for todo storage operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(TodoId),
    InvalidData(String),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract consumed by `TodoStore`.
pub trait TodoRepository {
    /// Inserts a new row and returns the storage-assigned id.
    fn insert_todo(&self, todo: &Todo) -> RepoResult<TodoId>;
    /// Overwrites title/description/status of the row matching `todo.id`.
    fn update_todo(&self, todo: &Todo) -> RepoResult<()>;
    /// Removes the row matching `id`.
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
    /// Reads every row.
    fn list_todos(&self) -> RepoResult<Vec<Todo>>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
}

/// SQLite-backed todo repository owning its connection.
pub struct SqliteTodoRepository {
    conn: Connection,
}

impl SqliteTodoRepository {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema
    ///   does not have the expected shape.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(&conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let columns = table_columns(&conn, TODOS_TABLE)?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable(TODOS_TABLE));
        }
        if let Some(column) = REQUIRED_TODO_COLUMNS
            .iter()
            .copied()
            .find(|required| !columns.iter().any(|name| name.as_str() == *required))
        {
            return Err(RepoError::MissingRequiredColumn {
                table: TODOS_TABLE,
                column,
            });
        }

        Ok(Self { conn })
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TodoRepository for SqliteTodoRepository {
    fn insert_todo(&self, todo: &Todo) -> RepoResult<TodoId> {
        self.conn.execute(
            "INSERT INTO todos (title, description, status) VALUES (?1, ?2, ?3);",
            params![
                todo.title.as_str(),
                todo.description.as_str(),
                todo.status.as_str()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_todo(&self, todo: &Todo) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                title = ?1,
                description = ?2,
                status = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                todo.title.as_str(),
                todo.description.as_str(),
                todo.status.as_str(),
                todo.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(todo.id));
        }
        Ok(())
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_todos(&self) -> RepoResult<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_todo_row(row)?)),
            None => Ok(None),
        }
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let status_text: String = row.get("status")?;
    let status = TodoStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in todos.status"))
    })?;

    Ok(Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
    })
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let exists = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    if exists.is_none() {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
