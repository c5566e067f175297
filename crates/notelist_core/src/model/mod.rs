//! Domain model for the note list core.
//!
//! # Responsibility
//! - Define row identity, transition tags and the outbound event vocabulary.
//! - Keep these types free of view state so every controller can share them.
//!
//! # Invariants
//! - Every row is identified by a stable `RowId`.
//! - Events carry row ids, never positions, so consumers tolerate reorders.

pub mod event;
pub mod row;
pub mod transition;
