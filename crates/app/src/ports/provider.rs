//! Provider port — server-side producers of widget data.
//!
//! A provider backs one widget on `GET /api/widget/{name}`. Implementations
//! live in adapter crates (e.g. `adapter_providers`).

use std::future::Future;

use dashdeck_domain::error::ProviderError;
use dashdeck_domain::widget::WidgetConfig;

pub trait WidgetProvider {
    /// Kind, refresh interval and title the provider suggests for its widget.
    fn default_config(&self) -> WidgetConfig;

    /// Produce the widget's current `data` payload.
    fn fetch_data(&self) -> impl Future<Output = Result<serde_json::Value, ProviderError>> + Send;
}
