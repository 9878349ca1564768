//! Server-side rendered HTML dashboard (no JavaScript).
//!
//! `GET /` renders the controller's page. Controls are forms that POST back
//! and redirect to `/` (PRG pattern); the page reloads itself through
//! `<meta http-equiv="refresh">`.

use askama::Template;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};

use dashdeck_app::page::WidgetView;
use dashdeck_app::ports::{LayoutStore, WidgetProvider, WidgetSource};
use dashdeck_domain::layout::Layout;
use dashdeck_domain::widget::WidgetName;

use crate::error::ApiError;
use crate::state::AppState;
use crate::widgets;

/// Build the dashboard sub-router for SSR HTML pages.
pub fn routes<P, S, L>() -> Router<AppState<P, S, L>>
where
    P: WidgetProvider + Send + Sync + 'static,
    S: WidgetSource + Send + Sync + 'static,
    L: LayoutStore + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index::<P, S, L>))
        .route("/layout/toggle", post(toggle_layout::<P, S, L>))
        .route("/widgets/refresh", post(refresh_all::<P, S, L>))
        .route("/widgets/{name}/refresh", post(refresh_one::<P, S, L>))
}

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    title: String,
    refresh_seconds: u32,
    container_class: String,
    layout: Layout,
    next_layout: Layout,
    widgets: Vec<WidgetPanel>,
}

/// One widget of the page with its content already rendered.
pub struct WidgetPanel {
    name: String,
    title: String,
    content_id: String,
    status_id: String,
    status_class: String,
    content_html: String,
    visible: bool,
}

impl TryFrom<WidgetView> for WidgetPanel {
    type Error = askama::Error;

    fn try_from(view: WidgetView) -> Result<Self, Self::Error> {
        let content_html = match &view.content {
            Some(content) => widgets::render(&view.name, content)?,
            None => String::new(),
        };
        Ok(Self {
            visible: view.is_visible(),
            name: view.name.to_string(),
            title: view.title,
            content_id: view.content_id,
            status_id: view.status_id,
            status_class: view.status_class,
            content_html,
        })
    }
}

/// Template failure answered with a bare 500.
pub struct RenderFailure(askama::Error);

impl IntoResponse for RenderFailure {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "dashboard failed to render");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl IntoResponse for DashboardTemplate {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => RenderFailure(err).into_response(),
        }
    }
}

/// `GET /` — the dashboard.
pub async fn index<P, S, L>(
    State(state): State<AppState<P, S, L>>,
) -> Result<DashboardTemplate, RenderFailure>
where
    P: WidgetProvider + Send + Sync + 'static,
    S: WidgetSource + Send + Sync + 'static,
    L: LayoutStore + Send + Sync + 'static,
{
    let snapshot = state.page.snapshot();
    let layout = Layout::from_container_class(&snapshot.container_class);
    let widgets = snapshot
        .widgets
        .into_iter()
        .map(WidgetPanel::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(RenderFailure)?;

    Ok(DashboardTemplate {
        title: state.settings.title.clone(),
        refresh_seconds: state.settings.page_refresh_secs,
        container_class: snapshot.container_class,
        layout,
        next_layout: layout.next(),
        widgets,
    })
}

/// `POST /layout/toggle` — switch to the next layout (PRG).
pub async fn toggle_layout<P, S, L>(
    State(state): State<AppState<P, S, L>>,
) -> Result<Redirect, ApiError>
where
    P: WidgetProvider + Send + Sync + 'static,
    S: WidgetSource + Send + Sync + 'static,
    L: LayoutStore + Send + Sync + 'static,
{
    state.layout.toggle().await?;
    Ok(Redirect::to("/"))
}

/// `POST /widgets/refresh` — reload every widget (PRG).
pub async fn refresh_all<P, S, L>(State(state): State<AppState<P, S, L>>) -> Redirect
where
    P: WidgetProvider + Send + Sync + 'static,
    S: WidgetSource + Send + Sync + 'static,
    L: LayoutStore + Send + Sync + 'static,
{
    state.controller.refresh_all().await;
    Redirect::to("/")
}

/// `POST /widgets/{name}/refresh` — reload one widget (PRG).
///
/// Unknown or malformed names are ignored.
pub async fn refresh_one<P, S, L>(
    State(state): State<AppState<P, S, L>>,
    Path(name): Path<String>,
) -> Redirect
where
    P: WidgetProvider + Send + Sync + 'static,
    S: WidgetSource + Send + Sync + 'static,
    L: LayoutStore + Send + Sync + 'static,
{
    if let Ok(name) = WidgetName::new(name) {
        state.controller.refresh_one(&name).await;
    }
    Redirect::to("/")
}
