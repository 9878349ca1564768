//! Shared application state for axum handlers.

use std::sync::Arc;

use dashdeck_app::page::Page;
use dashdeck_app::services::catalog::WidgetCatalog;
use dashdeck_app::services::controller::DashboardController;
use dashdeck_app::services::layout_toggler::LayoutToggler;

/// Presentation settings of the dashboard page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub title: String,
    /// Auto-reload period of the page, in seconds.
    pub page_refresh_secs: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "Dashboard".to_string(),
            page_refresh_secs: 5,
        }
    }
}

/// Application state shared across all axum handlers.
///
/// Generic over the provider type `P` behind the catalog, the widget source
/// `S` the controller fetches from and the layout store `L`, to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<P, S, L> {
    /// Server-side widget registry.
    pub catalog: Arc<WidgetCatalog<P>>,
    pub controller: Arc<DashboardController<S, Page>>,
    pub layout: Arc<LayoutToggler<L, Page>>,
    /// Page the controller renders into.
    pub page: Arc<Page>,
    pub settings: Arc<DashboardSettings>,
}

impl<P, S, L> Clone for AppState<P, S, L> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            controller: Arc::clone(&self.controller),
            layout: Arc::clone(&self.layout),
            page: Arc::clone(&self.page),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<P, S, L> AppState<P, S, L> {
    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// The controller and the layout toggler must write into `page`.
    pub fn from_arcs(
        catalog: Arc<WidgetCatalog<P>>,
        controller: Arc<DashboardController<S, Page>>,
        layout: Arc<LayoutToggler<L, Page>>,
        page: Arc<Page>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            catalog,
            controller,
            layout,
            page,
            settings: Arc::new(settings),
        }
    }
}
