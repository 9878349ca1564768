//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into these via
//! `#[from]` or an explicit `From` impl.

/// Top-level error for dashboard operations that can fail.
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Failure of the durable store (layout preference, settings).
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("widget name must not be empty")]
    EmptyWidgetName,

    #[error("widget name {0:?} contains characters other than ASCII letters, digits, '_' or '-'")]
    InvalidWidgetName(String),

    #[error("widget {0:?} is declared more than once")]
    DuplicateWidget(String),

    #[error("unknown layout {0:?}")]
    UnknownLayout(String),
}

/// Lookup of a named resource that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failure to reach the widget endpoint or to decode its body.
///
/// Displays as the underlying error's description.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// Failure of a server-side widget data provider.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ProviderError(Box<dyn std::error::Error + Send + Sync>);

impl ProviderError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

/// Widget data that cannot be rendered for its declared kind.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("section {section:?} has no total")]
    MissingTotal { section: String },

    #[error("section {section:?} has an invalid total ({total})")]
    InvalidTotal { section: String, total: serde_json::Value },

    #[error("section {section:?} has a non-numeric value for {item:?}")]
    NonNumericValue { section: String, item: String },

    #[error("payload does not match the widget kind: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Why a widget load did not end `online`.
#[derive(Debug, thiserror::Error)]
pub enum WidgetFailure {
    /// The endpoint answered with a non-success status.
    #[error("{0}")]
    Application(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl WidgetFailure {
    /// Status the widget indicator shows for this failure.
    #[must_use]
    pub fn status(&self) -> crate::status::WidgetStatus {
        use crate::status::WidgetStatus;

        match self {
            Self::Application(_) | Self::Render(_) => WidgetStatus::Error,
            Self::Transport(_) => WidgetStatus::Offline,
        }
    }
}
