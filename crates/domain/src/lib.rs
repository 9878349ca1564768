//! # dashdeck-domain
//!
//! Pure domain model for the dashdeck modular dashboard.
//!
//! ## Responsibilities
//! - Foundational types: widget names, error conventions, DOM addressing
//! - Define **Widgets** (named panels with a declared rendering kind)
//! - Define **Payloads** (typed widget data parsed from the JSON wire body)
//! - Define **Content** (parsed data or an inline error per widget)
//! - Define **Statuses** (`online`, `error`, `offline`)
//! - Define **Layouts** (`grid`, `list`, `masonry`) and their cycle
//! - Define the **Envelope** exchanged on `GET /api/widget/{name}`
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod content;
pub mod dom;
pub mod envelope;
pub mod error;
pub mod layout;
pub mod payload;
pub mod status;
pub mod widget;
