//! Widget — a named, independently refreshed dashboard panel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Unique key of a widget.
///
/// Restricted to ASCII letters, digits, `_` and `-` so it can be embedded in
/// DOM ids and URL paths without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WidgetName(String);

impl WidgetName {
    /// Validate and wrap a widget name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyWidgetName`] or
    /// [`ValidationError::InvalidWidgetName`].
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyWidgetName);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidWidgetName(name));
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WidgetName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for WidgetName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WidgetName> for String {
    fn from(name: WidgetName) -> Self {
        name.0
    }
}

/// Rendering kind declared by a widget.
///
/// Unknown tags deserialize to [`Generic`](Self::Generic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Card,
    Chart,
    List,
    Digital,
    #[default]
    #[serde(other)]
    Generic,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => f.write_str("card"),
            Self::Chart => f.write_str("chart"),
            Self::List => f.write_str("list"),
            Self::Digital => f.write_str("digital"),
            Self::Generic => f.write_str("generic"),
        }
    }
}

/// Static configuration of a widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(rename = "type", default)]
    pub kind: WidgetKind,
    /// Auto-refresh period in milliseconds; `0` disables auto-refresh.
    #[serde(default)]
    pub refresh_interval: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl WidgetConfig {
    #[must_use]
    pub fn new(kind: WidgetKind, refresh_interval: u64) -> Self {
        Self {
            kind,
            refresh_interval,
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Refresh period, or `None` when auto-refresh is disabled.
    #[must_use]
    pub fn refresh_period(&self) -> Option<std::time::Duration> {
        (self.refresh_interval > 0).then(|| std::time::Duration::from_millis(self.refresh_interval))
    }

    /// Title shown in the widget header.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown Widget")
    }
}

/// A widget as handed to the dashboard at initialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    pub name: WidgetName,
    pub config: WidgetConfig,
}

impl WidgetDescriptor {
    #[must_use]
    pub fn new(name: WidgetName, config: WidgetConfig) -> Self {
        Self { name, config }
    }
}
