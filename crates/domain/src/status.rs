//! Widget status — the health of a widget's last load.

use serde::{Deserialize, Serialize};

/// Outcome of the most recent fetch-and-render of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetStatus {
    Online,
    Error,
    Offline,
}

impl WidgetStatus {
    /// Class list written to the widget's status indicator.
    #[must_use]
    pub fn indicator_class(self) -> String {
        format!("widget-status status-{self}")
    }
}

impl std::fmt::Display for WidgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Error => f.write_str("error"),
            Self::Offline => f.write_str("offline"),
        }
    }
}
