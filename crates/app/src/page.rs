//! In-process page surface.
//!
//! Holds the dashboard container and, per mounted widget, a content node and
//! a status indicator addressed by their DOM ids. The HTTP adapter renders a
//! [`PageSnapshot`] of it as HTML.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashdeck_domain::content::WidgetContent;
use dashdeck_domain::dom::{self, CONTAINER_BASE_CLASS};
use dashdeck_domain::status::WidgetStatus;
use dashdeck_domain::widget::{WidgetDescriptor, WidgetName};

use crate::ports::PageSurface;

/// Class of a status indicator before the widget's first load.
pub const PENDING_STATUS_CLASS: &str = "widget-status";

struct Slot {
    descriptor: WidgetDescriptor,
    content: Option<WidgetContent>,
    status: Option<WidgetStatus>,
}

struct State {
    container_class: String,
    slots: Vec<Slot>,
}

/// Shared, thread-safe page model.
pub struct Page {
    state: RwLock<State>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            state: RwLock::new(State {
                container_class: CONTAINER_BASE_CLASS.to_string(),
                slots: Vec::new(),
            }),
        }
    }
}

/// Read-only copy of one widget's nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub name: WidgetName,
    pub title: String,
    pub content_id: String,
    pub status_id: String,
    pub status_class: String,
    /// `None` until the widget has been loaded once.
    pub content: Option<WidgetContent>,
}

impl WidgetView {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.content.is_some()
    }
}

/// Read-only copy of the whole page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub container_class: String,
    pub widgets: Vec<WidgetView>,
}

impl Page {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with a slot for each widget, in order.
    #[must_use]
    pub fn with_widgets<'a>(widgets: impl IntoIterator<Item = &'a WidgetDescriptor>) -> Self {
        let page = Self::new();
        for descriptor in widgets {
            page.mount(descriptor);
        }
        page
    }

    /// Add a widget's nodes, replacing an earlier mount of the same name.
    pub fn mount(&self, descriptor: &WidgetDescriptor) {
        let mut state = self.write();
        let slot = Slot {
            descriptor: descriptor.clone(),
            content: None,
            status: None,
        };
        match state
            .slots
            .iter_mut()
            .find(|s| s.descriptor.name == descriptor.name)
        {
            Some(existing) => *existing = slot,
            None => state.slots.push(slot),
        }
    }

    #[must_use]
    pub fn content(&self, widget: &WidgetName) -> Option<WidgetContent> {
        self.read()
            .slots
            .iter()
            .find(|s| &s.descriptor.name == widget)
            .and_then(|s| s.content.clone())
    }

    #[must_use]
    pub fn status(&self, widget: &WidgetName) -> Option<WidgetStatus> {
        self.read()
            .slots
            .iter()
            .find(|s| &s.descriptor.name == widget)
            .and_then(|s| s.status)
    }

    /// Content of the node with DOM id `id`, if it is a loaded content node.
    #[must_use]
    pub fn content_by_id(&self, id: &str) -> Option<WidgetContent> {
        self.read()
            .slots
            .iter()
            .find(|s| dom::content_id(&s.descriptor.name) == id)
            .and_then(|s| s.content.clone())
    }

    /// Class of the node with DOM id `id`, if it is a status indicator.
    #[must_use]
    pub fn status_class_by_id(&self, id: &str) -> Option<String> {
        self.read()
            .slots
            .iter()
            .find(|s| dom::status_id(&s.descriptor.name) == id)
            .map(status_class)
    }

    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        let state = self.read();
        PageSnapshot {
            container_class: state.container_class.clone(),
            widgets: state
                .slots
                .iter()
                .map(|slot| WidgetView {
                    name: slot.descriptor.name.clone(),
                    title: slot.descriptor.config.display_title().to_string(),
                    content_id: dom::content_id(&slot.descriptor.name),
                    status_id: dom::status_id(&slot.descriptor.name),
                    status_class: status_class(slot),
                    content: slot.content.clone(),
                })
                .collect(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn status_class(slot: &Slot) -> String {
    slot.status.map_or_else(
        || PENDING_STATUS_CLASS.to_string(),
        WidgetStatus::indicator_class,
    )
}

impl PageSurface for Page {
    fn replace_content(&self, widget: &WidgetName, content: WidgetContent) {
        let mut state = self.write();
        match state.slots.iter_mut().find(|s| &s.descriptor.name == widget) {
            Some(slot) => slot.content = Some(content),
            None => tracing::debug!(widget = %widget, "no content node for widget"),
        }
    }

    fn set_status(&self, widget: &WidgetName, status: WidgetStatus) {
        let mut state = self.write();
        if let Some(slot) = state.slots.iter_mut().find(|s| &s.descriptor.name == widget) {
            slot.status = Some(status);
        }
    }

    fn container_class(&self) -> String {
        self.read().container_class.clone()
    }

    fn set_container_class(&self, class: String) {
        self.write().container_class = class;
    }
}
