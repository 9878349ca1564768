//! Deterministic DOM addressing for widget nodes.

use crate::widget::WidgetName;

/// Class list shared by every dashboard container.
pub const CONTAINER_BASE_CLASS: &str = "dashboard-container";

/// Id of the node holding a widget's rendered content.
#[must_use]
pub fn content_id(name: &WidgetName) -> String {
    format!("widget-{name}")
}

/// Id of the node holding a widget's status indicator.
#[must_use]
pub fn status_id(name: &WidgetName) -> String {
    format!("status-{name}")
}
