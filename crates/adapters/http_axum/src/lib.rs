//! # dashdeck-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **widget data API** (`/api/widget/{name}`) answered by the
//!   widget catalog, plus a status endpoint
//! - Serve the **server-side-rendered dashboard** from the controller's
//!   page, with **zero JavaScript**: pure HTML forms +
//!   `<meta http-equiv="refresh">` for live updates
//! - Render each widget kind through its own askama template
//! - Map form posts (layout toggle, widget refresh) into application
//!   service calls and redirect back (PRG pattern)
//!
//! ## Dependency rule
//! Depends on `dashdeck-app` (for port traits and services) and
//! `dashdeck-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;
pub mod widgets;

pub use state::{AppState, DashboardSettings};
