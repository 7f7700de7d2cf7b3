//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the single persisted entity shared by storage, store and FFI.
//!
//! # Invariants
//! - Every visible `Todo` carries a storage-assigned `TodoId`.

pub mod todo;
