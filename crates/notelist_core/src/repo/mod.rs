//! Row source abstractions and the in-memory row index.
//!
//! # Responsibility
//! - Define the ordering contract every controller reads rows through.
//! - Keep structural mutation (reorder, delete) behind one trait boundary.
//!
//! # Invariants
//! - Only the owning store, the drop handler and the deferred-removal path
//!   mutate order or membership.

pub mod row_index;
