//! Repository layer: the persistence gateway behind the todo store.
//!
//! # Responsibility
//! - Define the insert/update/delete/list-all contract the store consumes.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod todo_repo;
