//! Row domain model.
//!
//! # Responsibility
//! - Define the identity and flags the list core consumes for one note row.
//! - Map interactive content to an overlay kind without runtime downcasting.
//!
//! # Invariants
//! - `RowId` is stable for the row lifetime and never reused while present.
//! - Ordinal position is not part of identity; it is owned by the row source.

use serde::{Deserialize, Serialize};

/// Stable identifier of one note row.
pub type RowId = i64;

/// Folder identifier used by move-to intents.
pub type FolderId = i64;

/// Tag identifier used by tag intents.
pub type TagId = i64;

/// Row variant selecting which overlay capability (if any) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Static content only; never hosts an overlay.
    Plain,
    /// Carries interactive content (tag chips) rendered through an overlay.
    Interactive,
}

impl RowKind {
    /// Derives the kind from the `has_interactive_content` flag.
    pub fn from_interactive(has_interactive_content: bool) -> Self {
        if has_interactive_content {
            Self::Interactive
        } else {
            Self::Plain
        }
    }

    /// Returns whether rows of this kind qualify for an overlay.
    pub fn wants_overlay(self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// One note row as seen by the list core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Stable note id.
    pub id: RowId,
    /// Pinned rows live in the prefix partition of the ordering.
    pub pinned: bool,
    /// Whether the row needs an interactive overlay.
    pub has_interactive_content: bool,
}

impl Row {
    /// Creates an unpinned row without interactive content.
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            pinned: false,
            has_interactive_content: false,
        }
    }

    /// Creates a pinned row without interactive content.
    pub fn pinned(id: RowId) -> Self {
        Self {
            pinned: true,
            ..Self::new(id)
        }
    }

    /// Returns a copy flagged as carrying interactive content.
    pub fn with_interactive(mut self, has_interactive_content: bool) -> Self {
        self.has_interactive_content = has_interactive_content;
        self
    }

    /// Returns the overlay variant for this row.
    pub fn kind(&self) -> RowKind {
        RowKind::from_interactive(self.has_interactive_content)
    }
}

#[cfg(test)]
mod tests {
    use super::{Row, RowKind};

    #[test]
    fn kind_follows_interactive_flag() {
        assert_eq!(Row::new(1).kind(), RowKind::Plain);
        assert_eq!(Row::new(1).with_interactive(true).kind(), RowKind::Interactive);
        assert!(RowKind::Interactive.wants_overlay());
        assert!(!RowKind::Plain.wants_overlay());
    }

    #[test]
    fn pinned_constructor_sets_flag_only() {
        let row = Row::pinned(7);
        assert!(row.pinned);
        assert!(!row.has_interactive_content);
        assert_eq!(row.id, 7);
    }
}
