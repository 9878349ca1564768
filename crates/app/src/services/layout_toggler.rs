//! Layout toggler — cycles the container layout and persists the choice.

use std::sync::Arc;

use dashdeck_domain::error::DashError;
use dashdeck_domain::layout::Layout;

use crate::ports::{LayoutStore, PageSurface};

/// Application service for the layout preference.
pub struct LayoutToggler<S, P> {
    store: S,
    surface: Arc<P>,
}

impl<S, P> LayoutToggler<S, P>
where
    S: LayoutStore + Send + Sync,
    P: PageSurface + Send + Sync,
{
    /// Create a toggler persisting to `store` and rewriting `surface`.
    pub fn new(store: S, surface: Arc<P>) -> Self {
        Self { store, surface }
    }

    /// Apply the persisted layout, if one exists, to the container.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn restore(&self) -> Result<Option<Layout>, DashError> {
        let saved = self.store.load().await?;
        if let Some(layout) = saved {
            self.surface.set_container_class(layout.container_class());
            tracing::info!(%layout, "restored saved layout");
        }
        Ok(saved)
    }

    /// Layout currently shown by the container.
    #[must_use]
    pub fn current(&self) -> Layout {
        Layout::from_container_class(&self.surface.container_class())
    }

    /// Switch to the next layout in the cycle and persist it.
    ///
    /// The container is rewritten before the store is written, so a storage
    /// failure leaves the new layout displayed but not persisted.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn toggle(&self) -> Result<Layout, DashError> {
        let next = self.current().next();
        self.surface.set_container_class(next.container_class());
        self.store.save(next).await?;
        tracing::debug!(layout = %next, "layout toggled");
        Ok(next)
    }
}
