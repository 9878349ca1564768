//! Page surface port — the rendering substrate widgets are written into.
//!
//! Widget nodes are addressed by the ids from
//! [`dashdeck_domain::dom`]; writes to widgets the page does not contain are
//! ignored.

use dashdeck_domain::content::WidgetContent;
use dashdeck_domain::status::WidgetStatus;
use dashdeck_domain::widget::WidgetName;

pub trait PageSurface {
    /// Replace the content node of `widget` and make it visible.
    fn replace_content(&self, widget: &WidgetName, content: WidgetContent);

    /// Rewrite the class of the status indicator of `widget`.
    fn set_status(&self, widget: &WidgetName, status: WidgetStatus);

    /// Current class list of the dashboard container.
    fn container_class(&self) -> String;

    fn set_container_class(&self, class: String);
}

impl<T: PageSurface> PageSurface for std::sync::Arc<T> {
    fn replace_content(&self, widget: &WidgetName, content: WidgetContent) {
        (**self).replace_content(widget, content);
    }

    fn set_status(&self, widget: &WidgetName, status: WidgetStatus) {
        (**self).set_status(widget, status);
    }

    fn container_class(&self) -> String {
        (**self).container_class()
    }

    fn set_container_class(&self, class: String) {
        (**self).set_container_class(class);
    }
}
