//! Layout store port — durable persistence of the layout preference.

use std::future::Future;

use dashdeck_domain::error::DashError;
use dashdeck_domain::layout::Layout;

/// Durable key/value slot holding the chosen [`Layout`].
pub trait LayoutStore {
    /// Read the persisted layout, if any.
    fn load(&self) -> impl Future<Output = Result<Option<Layout>, DashError>> + Send;

    /// Persist `layout`, replacing any previous value.
    fn save(&self, layout: Layout) -> impl Future<Output = Result<(), DashError>> + Send;
}
