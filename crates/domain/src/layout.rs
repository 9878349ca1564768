//! Layout — the container-level arrangement of widgets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dom::CONTAINER_BASE_CLASS;
use crate::error::ValidationError;

/// Key under which the chosen layout is persisted.
pub const LAYOUT_STORAGE_KEY: &str = "dashboardLayout";

/// Arrangement of the dashboard container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Grid,
    List,
    #[default]
    Masonry,
}

impl Layout {
    /// Next layout in the cycle `grid → list → masonry → grid`.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Masonry,
            Self::Masonry => Self::Grid,
        }
    }

    /// Read the layout from a container class list.
    ///
    /// Anything without `layout-grid` or `layout-list` is masonry.
    #[must_use]
    pub fn from_container_class(class: &str) -> Self {
        let mut classes = class.split_whitespace();
        if classes.clone().any(|c| c == "layout-grid") {
            Self::Grid
        } else if classes.any(|c| c == "layout-list") {
            Self::List
        } else {
            Self::Masonry
        }
    }

    /// Full class list for a container showing this layout.
    #[must_use]
    pub fn container_class(self) -> String {
        format!("{CONTAINER_BASE_CLASS} layout-{self}")
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
            Self::Masonry => "masonry",
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            "masonry" => Ok(Self::Masonry),
            other => Err(ValidationError::UnknownLayout(other.to_string())),
        }
    }
}
