//! # dashdeck-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `WidgetSource` — fetch a widget's envelope
//!   - `LayoutStore` — persist the layout preference
//!   - `WidgetProvider` — produce widget data on the server side
//!   - `PageSurface` — the substrate widgets are rendered into
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DashboardController` — load, refresh and schedule widgets
//!   - `LayoutToggler` — cycle and persist the layout
//!   - `WidgetCatalog` — answer widget data requests from providers
//! - Provide an in-process **page** holding each widget's parsed content
//!
//! ## Dependency rule
//! Depends on `dashdeck-domain` only (plus `tokio` for tasks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod page;
pub mod ports;
pub mod services;
