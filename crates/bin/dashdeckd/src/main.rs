//! # dashdeckd — dashdeck daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars, command-line flags);
//!   `--check-config` stops after validation
//! - Open the `SQLite` settings store and run migrations
//! - Register the configured widget providers in the catalog
//! - Construct the dashboard controller and layout toggler, injecting
//!   adapters via port traits, and restore the saved layout
//! - Build the axum router, bind to a TCP port and serve
//! - Load and schedule widgets once the server accepts connections
//! - Handle graceful shutdown (Ctrl-C), stopping every refresh timer
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;

use std::sync::Arc;

use clap::Parser;
use dashdeck_adapter_http_axum::router;
use dashdeck_adapter_http_axum::state::{AppState, DashboardSettings};
use dashdeck_adapter_http_reqwest::HttpWidgetSource;
use dashdeck_adapter_providers::BuiltinProvider;
use dashdeck_adapter_storage_sqlite_sqlx::SqliteSettingsRepository;
use dashdeck_app::page::Page;
use dashdeck_app::services::catalog::{ConfigOverrides, WidgetCatalog};
use dashdeck_app::services::controller::DashboardController;
use dashdeck_app::services::layout_toggler::LayoutToggler;
use dashdeck_domain::widget::WidgetName;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    if cli.check_config {
        let catalog = build_catalog(&config)?;
        println!(
            "configuration OK: {} widget(s), listening on {}",
            catalog.len(),
            config.bind_addr()
        );
        return Ok(());
    }

    init_tracing(&config.logging.filter);

    // Database
    let settings_repo = SqliteSettingsRepository::connect(config.database_url()).await?;

    // Widgets
    let catalog = build_catalog(&config)?;
    let descriptors = catalog.descriptors();
    let page = Arc::new(Page::with_widgets(&descriptors));

    // Services
    let source = HttpWidgetSource::new(config.api_base_url())?;
    let controller = Arc::new(DashboardController::from_arcs(
        Arc::new(source),
        Arc::clone(&page),
    ));
    let layout = LayoutToggler::new(settings_repo, Arc::clone(&page));
    layout.restore().await?;

    // HTTP
    let state = AppState::from_arcs(
        Arc::new(catalog),
        Arc::clone(&controller),
        Arc::new(layout),
        page,
        DashboardSettings {
            title: config.dashboard.title.clone(),
            page_refresh_secs: config.dashboard.page_refresh_secs,
        },
    );
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        %bind_addr,
        widgets = descriptors.len(),
        api = %config.api_base_url(),
        "dashdeckd listening"
    );

    let loader = Arc::clone(&controller);
    tokio::spawn(async move {
        loader.initialize(descriptors).await;
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.stop_all();
    tracing::info!("dashdeckd stopped");
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?}: {err}, falling back to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Register every enabled widget with a provider built from its settings.
fn build_catalog(config: &Config) -> Result<WidgetCatalog<BuiltinProvider>, BoxError> {
    let mut catalog = WidgetCatalog::new();
    for entry in config.enabled_widgets() {
        let name = WidgetName::new(entry.name.as_str())?;
        tracing::info!(widget = %name, provider = entry.provider.name(), "loading widget");
        catalog.register(
            name,
            entry.provider.clone().build()?,
            ConfigOverrides {
                title: entry.title.clone(),
                refresh_interval: entry.refresh_interval,
            },
        )?;
    }
    Ok(catalog)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
