//! End-to-end tests for the full dashdeckd stack.
//!
//! Each test wires the complete application (in-memory `SQLite`, real
//! providers, real services, real axum router). HTTP requests are sent via
//! `tower::ServiceExt::oneshot`; the controller fetches widget data over a
//! real loopback listener.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dashdeck_adapter_http_axum::router;
use dashdeck_adapter_http_axum::state::{AppState, DashboardSettings};
use dashdeck_adapter_http_reqwest::HttpWidgetSource;
use dashdeck_adapter_providers::{
    BuiltinProvider, ClockProvider, ClockSettings, StaticProvider, StaticSettings,
};
use dashdeck_adapter_storage_sqlite_sqlx::SqliteSettingsRepository;
use dashdeck_app::page::Page;
use dashdeck_app::services::catalog::{ConfigOverrides, WidgetCatalog};
use dashdeck_app::services::controller::DashboardController;
use dashdeck_app::services::layout_toggler::LayoutToggler;
use dashdeck_domain::layout::Layout;
use dashdeck_domain::widget::{WidgetKind, WidgetName};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

type State = AppState<BuiltinProvider, HttpWidgetSource, SqliteSettingsRepository>;

struct Harness {
    state: State,
    settings: SqliteSettingsRepository,
}

fn catalog() -> WidgetCatalog<BuiltinProvider> {
    let mut catalog = WidgetCatalog::new();
    let widgets = [
        (
            "clock",
            BuiltinProvider::Clock(ClockProvider::new(ClockSettings::default())),
            ConfigOverrides {
                refresh_interval: Some(0),
                ..ConfigOverrides::default()
            },
        ),
        (
            "usage",
            BuiltinProvider::Static(StaticProvider::new(StaticSettings {
                kind: WidgetKind::Card,
                data: json!({"CPU": {"type": "stacked-bar-chart", "total": 100, "used": 40}}),
            })),
            ConfigOverrides {
                title: Some("Usage".to_string()),
                refresh_interval: None,
            },
        ),
        (
            "news",
            BuiltinProvider::Static(StaticProvider::new(StaticSettings {
                kind: WidgetKind::List,
                data: json!({"items": []}),
            })),
            ConfigOverrides::default(),
        ),
    ];
    for (name, provider, overrides) in widgets {
        catalog
            .register(WidgetName::new(name).unwrap(), provider, overrides)
            .unwrap();
    }
    catalog
}

/// Build a fully-wired state whose controller fetches from `api_base_url`.
async fn harness(api_base_url: &str) -> Harness {
    let settings = SqliteSettingsRepository::connect("sqlite::memory:")
        .await
        .expect("in-memory database should initialise");

    let catalog = catalog();
    let page = Arc::new(Page::with_widgets(&catalog.descriptors()));
    let source = HttpWidgetSource::new(api_base_url).unwrap();
    let controller = DashboardController::from_arcs(Arc::new(source), Arc::clone(&page));
    let layout = LayoutToggler::new(settings.clone(), Arc::clone(&page));
    layout.restore().await.unwrap();

    let state = AppState::from_arcs(
        Arc::new(catalog),
        Arc::new(controller),
        Arc::new(layout),
        page,
        DashboardSettings::default(),
    );
    Harness { state, settings }
}

/// Bind an ephemeral loopback listener and return it with its base URL.
async fn listen() -> (tokio::net::TcpListener, String) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    (listener, url)
}

async fn request(state: &State, method: &str, uri: &str) -> (StatusCode, String) {
    let response = router::build(state.clone())
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let harness = harness("http://127.0.0.1:9").await;
    let (status, body) = request(&harness.state, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

// ---------------------------------------------------------------------------
// Widget API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_serve_provider_data_as_envelope() {
    let harness = harness("http://127.0.0.1:9").await;

    let (status, body) = request(&harness.state, "GET", "/api/widget/clock").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["timezone"], "UTC");
    assert_eq!(json["data"]["time"].as_str().unwrap().len(), 8);
}

#[tokio::test]
async fn should_answer_unknown_widget_with_not_found_envelope() {
    let harness = harness("http://127.0.0.1:9").await;

    let (status, body) = request(&harness.state, "GET", "/api/widget/weather").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, json!({"status": "error", "message": "Widget not found"}));
}

#[tokio::test]
async fn should_list_modules_in_status() {
    let harness = harness("http://127.0.0.1:9").await;

    let (_, body) = request(&harness.state, "GET", "/api/dashboard/status").await;

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json,
        json!({"status": "running", "modules": ["clock", "usage", "news"], "widgets": 3})
    );
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_render_every_widget_online_after_initialization() {
    let (listener, url) = listen().await;
    let harness = harness(&url).await;
    let app = router::build(harness.state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    harness
        .state
        .controller
        .initialize(harness.state.catalog.descriptors())
        .await;
    let (status, body) = request(&harness.state, "GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    for name in ["clock", "usage", "news"] {
        assert!(
            body.contains(&format!(
                r#"id="status-{name}" class="widget-status status-online""#
            )),
            "{name} should be online"
        );
    }
    assert!(body.contains("<h2>Usage</h2>"));
    assert!(body.contains("flex:40.00;"));
    assert!(body.contains("flex:60.00;"));
    assert!(body.contains(r#"<div class="empty">No data</div>"#));
    assert!(body.contains(r#"class="digital-time""#));
}

#[tokio::test]
async fn should_mark_widgets_offline_when_api_is_unreachable() {
    let (listener, url) = listen().await;
    drop(listener);
    let harness = harness(&url).await;

    harness
        .state
        .controller
        .initialize(harness.state.catalog.descriptors())
        .await;
    let (_, body) = request(&harness.state, "GET", "/").await;

    assert!(body.contains(r#"id="status-clock" class="widget-status status-offline""#));
    assert!(body.contains(r#"<div class="error">Error: "#));
}

#[tokio::test]
async fn should_persist_toggled_layout() {
    let harness = harness("http://127.0.0.1:9").await;

    let (status, _) = request(&harness.state, "POST", "/layout/toggle").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let (_, body) = request(&harness.state, "GET", "/").await;
    assert!(body.contains(r#"<main class="dashboard-container layout-grid">"#));

    let restarted = LayoutToggler::new(harness.settings.clone(), Arc::new(Page::new()));
    assert_eq!(restarted.restore().await.unwrap(), Some(Layout::Grid));
    assert_eq!(restarted.current(), Layout::Grid);
}
