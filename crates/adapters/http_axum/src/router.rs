//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use dashdeck_app::ports::{LayoutStore, WidgetProvider, WidgetSource};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Merges API routes under `/api` and dashboard routes at `/`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<P, S, L>(state: AppState<P, S, L>) -> Router
where
    P: WidgetProvider + Send + Sync + 'static,
    S: WidgetSource + Send + Sync + 'static,
    L: LayoutStore + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .merge(crate::dashboard::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
