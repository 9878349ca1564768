//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod layout_store;
pub mod page_surface;
pub mod provider;
pub mod widget_source;

pub use layout_store::LayoutStore;
pub use page_surface::PageSurface;
pub use provider::WidgetProvider;
pub use widget_source::WidgetSource;
