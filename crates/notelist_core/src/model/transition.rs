//! Per-row visual transition states.

use serde::{Deserialize, Serialize};

/// Visual transition tag carried by one row.
///
/// `Normal` means no transition is in flight; it is never stored as a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionState {
    Normal,
    Insert,
    Remove,
    MoveOut,
}

impl TransitionState {
    /// Stable name used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Insert => "insert",
            Self::Remove => "remove",
            Self::MoveOut => "move_out",
        }
    }
}
