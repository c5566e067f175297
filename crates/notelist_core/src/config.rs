//! List view configuration.
//!
//! # Responsibility
//! - Hold geometry and gesture constants the controllers depend on.
//! - Parse and validate JSON configuration supplied by the host shell.
//!
//! # Invariants
//! - Every field has a default, so partial documents are accepted.
//! - Heights are finite and strictly positive after `validate()`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_ROW_HEIGHT: f32 = 38.0;
const DEFAULT_SECTION_HEADER_HEIGHT: f32 = 25.0;
const DEFAULT_COLLAPSE_ICON_SIZE: f32 = 20.0;
const DEFAULT_START_DRAG_DISTANCE: f32 = 10.0;

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Input is not a valid configuration document.
    Parse(serde_json::Error),
    /// One field holds an unusable value.
    InvalidValue { field: &'static str, value: f32 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid list view config: {err}"),
            Self::InvalidValue { field, value } => {
                write!(f, "invalid value `{value}` for `{field}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Geometry and behavior settings for one list view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListViewConfig {
    /// Height of one laid-out row.
    pub row_height: f32,
    /// Header strip above the first pinned and first unpinned row.
    pub section_header_height: f32,
    /// Hit box edge of the pinned-collapse toggle.
    pub collapse_icon_size: f32,
    /// Manhattan distance a pressed pointer travels before a drag starts.
    pub start_drag_distance: f32,
    pub animation_enabled: bool,
}

impl Default for ListViewConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            section_header_height: DEFAULT_SECTION_HEADER_HEIGHT,
            collapse_icon_size: DEFAULT_COLLAPSE_ICON_SIZE,
            start_drag_distance: DEFAULT_START_DRAG_DISTANCE,
            animation_enabled: true,
        }
    }
}

impl ListViewConfig {
    /// Parses a JSON document and validates it.
    ///
    /// # Errors
    /// - `Parse` when the document is malformed.
    /// - `InvalidValue` when a field fails `validate()`.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks geometry values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("rowHeight", self.row_height),
            ("collapseIconSize", self.collapse_icon_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        for (field, value) in [
            ("sectionHeaderHeight", self.section_header_height),
            ("startDragDistance", self.start_drag_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}
