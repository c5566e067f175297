//! Context action planning for a secondary click.
//!
//! # Responsibility
//! - Decide which intents the context menu offers for the selected rows.
//! - Read folder and tag catalogs through the `NoteCatalog` seam.
//!
//! # Invariants
//! - A plan is only built for a non-empty row set.
//! - Pin choices are hidden in tag views and in the trash folder.
//! - The current folder is never offered as a move target.

use crate::model::row::{FolderId, Row, RowId, TagId};

/// Folder list and tag pool owned by the external store.
pub trait NoteCatalog {
    /// Folders a note can be moved to, in display order.
    fn folders(&self) -> Vec<FolderId>;
    /// Tags in the tag pool, in display order.
    fn tags(&self) -> Vec<TagId>;
    fn note_has_tag(&self, row: RowId, tag: TagId) -> bool;
}

/// Where the list is currently showing notes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewContext {
    /// Showing the trash.
    pub in_trash: bool,
    /// Showing notes filtered by tag.
    pub in_tag: bool,
    /// Parent folder of the listing is the trash folder.
    pub parent_is_trash: bool,
    pub current_folder: Option<FolderId>,
}

/// Which pin toggles to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinChoice {
    Pin,
    Unpin,
    Both,
}

/// Intents offered for one secondary click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextActionPlan {
    pub rows: Vec<RowId>,
    pub restore: bool,
    pub pin: Option<PinChoice>,
    pub move_targets: Vec<FolderId>,
    /// Tags every selected note carries.
    pub remove_tags: Vec<TagId>,
    /// Remaining tags of the pool.
    pub add_tags: Vec<TagId>,
    pub new_note: bool,
}

impl ContextActionPlan {
    /// Builds the plan for `rows` shown in `view`.
    pub fn build(rows: &[Row], view: &ViewContext, catalog: &impl NoteCatalog) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let pin = if view.in_tag || view.parent_is_trash {
            None
        } else {
            let any_pinned = rows.iter().any(|row| row.pinned);
            let any_unpinned = rows.iter().any(|row| !row.pinned);
            Some(match (any_pinned, any_unpinned) {
                (true, true) => PinChoice::Both,
                (true, false) => PinChoice::Unpin,
                _ => PinChoice::Pin,
            })
        };

        let move_targets = catalog
            .folders()
            .into_iter()
            .filter(|folder| Some(*folder) != view.current_folder)
            .collect();

        let (remove_tags, add_tags): (Vec<TagId>, Vec<TagId>) = catalog
            .tags()
            .into_iter()
            .partition(|tag| rows.iter().all(|row| catalog.note_has_tag(row.id, *tag)));

        Some(Self {
            rows: rows.iter().map(|row| row.id).collect(),
            restore: view.in_trash,
            pin,
            move_targets,
            remove_tags,
            add_tags,
            new_note: !view.in_trash,
        })
    }

    pub fn is_plural(&self) -> bool {
        self.rows.len() > 1
    }

    /// Menu labels for the fixed actions, in menu order.
    pub fn labels(&self) -> Vec<&'static str> {
        let plural = self.is_plural();
        let mut labels = Vec::new();
        if self.restore {
            labels.push(if plural { "Restore Notes" } else { "Restore Note" });
        }
        labels.push(if plural { "Delete Notes" } else { "Delete Note" });
        let (pin, unpin) = if plural {
            ("Pin Notes", "Unpin Notes")
        } else {
            ("Pin Note", "Unpin Note")
        };
        match self.pin {
            Some(PinChoice::Pin) => labels.push(pin),
            Some(PinChoice::Unpin) => labels.push(unpin),
            Some(PinChoice::Both) => labels.extend([pin, unpin]),
            None => {}
        }
        if self.new_note {
            labels.push("New Note");
        }
        labels
    }
}
