//! Content — what a widget's content node currently holds.

use crate::payload::WidgetData;

/// Outcome of a widget load as shown in its content node.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetContent {
    /// Data parsed for the widget's kind.
    Data(WidgetData),
    /// Inline error, shown as `Error: {message}`.
    Failure(String),
}

impl WidgetContent {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            Self::Data(_) => None,
        }
    }
}
