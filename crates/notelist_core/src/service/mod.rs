//! Use-case layer composing the view controllers.
//!
//! # Responsibility
//! - Wire overlay, selection, animation and drag controllers behind one
//!   façade fed by raw input.
//! - Plan context actions and emit intents toward external collaborators.

pub mod context_actions;
pub mod list_view;
