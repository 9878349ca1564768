//! JSON API handlers.
//!
//! - `GET /api/widget/{name}` — widget envelope, always `200 OK`; failures
//!   travel inside the envelope
//! - `GET /api/dashboard/status` — catalog status

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;

use dashdeck_app::ports::{LayoutStore, WidgetProvider, WidgetSource};
use dashdeck_app::services::catalog::CatalogStatus;
use dashdeck_domain::envelope::WidgetEnvelope;

use crate::state::AppState;

/// Build the API sub-router, to be nested under `/api`.
pub fn routes<P, S, L>() -> Router<AppState<P, S, L>>
where
    P: WidgetProvider + Send + Sync + 'static,
    S: WidgetSource + Send + Sync + 'static,
    L: LayoutStore + Send + Sync + 'static,
{
    Router::new()
        .route("/widget/{name}", get(widget::<P, S, L>))
        .route("/dashboard/status", get(status::<P, S, L>))
}

/// `GET /api/widget/{name}`
pub async fn widget<P, S, L>(
    State(state): State<AppState<P, S, L>>,
    Path(name): Path<String>,
) -> Json<WidgetEnvelope>
where
    P: WidgetProvider + Send + Sync + 'static,
    S: WidgetSource + Send + Sync + 'static,
    L: LayoutStore + Send + Sync + 'static,
{
    Json(state.catalog.fetch(&name).await)
}

/// `GET /api/dashboard/status`
pub async fn status<P, S, L>(State(state): State<AppState<P, S, L>>) -> Json<CatalogStatus>
where
    P: WidgetProvider + Send + Sync + 'static,
    S: WidgetSource + Send + Sync + 'static,
    L: LayoutStore + Send + Sync + 'static,
{
    Json(state.catalog.status())
}
