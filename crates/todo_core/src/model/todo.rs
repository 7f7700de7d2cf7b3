//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record and its status marker.
//! - Provide constructors for unsaved drafts and in-place revisions.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never changes afterwards.
//! - A revision keeps `id` and `status`; only text fields change.
//! - `title` may be empty; no validation beyond what callers perform.

use serde::{Deserialize, Serialize};

/// Storage-assigned identifier (SQLite `INTEGER PRIMARY KEY`).
pub type TodoId = i64;

/// Placeholder id carried by drafts that were never inserted.
pub const UNSAVED_TODO_ID: TodoId = 0;

/// Completion marker carried through unchanged by edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    /// Not finished yet. New items start here.
    #[default]
    Open,
    /// Finished.
    Done,
}

impl TodoStatus {
    /// Stable storage/FFI label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Done => "done",
        }
    }

    /// Parses a storage label, returning `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Storage-assigned key. `UNSAVED_TODO_ID` until inserted.
    pub id: TodoId,
    /// Short headline shown in bold in the list.
    pub title: String,
    /// Optional detail text, empty when not provided.
    pub description: String,
    pub status: TodoStatus,
}

impl Todo {
    /// Creates an unsaved draft with default status.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_TODO_ID,
            title: title.into(),
            description: description.into(),
            status: TodoStatus::default(),
        }
    }

    /// Returns a copy with new text fields, keeping identity and status.
    pub fn revised(&self, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: self.id,
            title: title.into(),
            description: description.into(),
            status: self.status,
        }
    }

    /// Whether storage has assigned this item an id.
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_TODO_ID
    }
}
