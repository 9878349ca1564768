//! Widget source port — where widget payloads come from.

use std::future::Future;
use std::sync::Arc;

use dashdeck_domain::envelope::WidgetEnvelope;
use dashdeck_domain::error::TransportError;
use dashdeck_domain::widget::WidgetName;

/// Fetches the envelope for one widget.
///
/// An envelope with a non-success status is a valid answer, not an error.
/// Errors are reserved for failures to reach the endpoint or decode its body.
pub trait WidgetSource {
    fn fetch(
        &self,
        name: &WidgetName,
    ) -> impl Future<Output = Result<WidgetEnvelope, TransportError>> + Send;
}

impl<T: WidgetSource + Send + Sync> WidgetSource for Arc<T> {
    fn fetch(
        &self,
        name: &WidgetName,
    ) -> impl Future<Output = Result<WidgetEnvelope, TransportError>> + Send {
        (**self).fetch(name)
    }
}
