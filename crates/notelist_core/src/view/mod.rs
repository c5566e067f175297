//! View-state controllers driven by pointer, scroll and animation input.
//!
//! # Responsibility
//! - Host the four controllers the list view façade composes.
//! - Keep each controller's state owned by that controller alone.
//!
//! # Invariants
//! - Controllers read row order only through `RowSource`.

pub mod animation;
pub mod drag;
pub mod layout;
pub mod overlay;
pub mod selection;
