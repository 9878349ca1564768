//! Widget catalog — the server-side registry answering `GET /api/widget/{name}`.

use serde::Serialize;

use dashdeck_domain::envelope::WidgetEnvelope;
use dashdeck_domain::error::{DashError, ValidationError};
use dashdeck_domain::widget::{WidgetConfig, WidgetDescriptor, WidgetName};

use crate::ports::WidgetProvider;

/// Message returned for names the catalog does not know.
pub const NOT_FOUND_MESSAGE: &str = "Widget not found";

/// Status value reported while the catalog is serving.
pub const RUNNING: &str = "running";

/// Configuration values that take precedence over a provider's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub title: Option<String>,
    pub refresh_interval: Option<u64>,
}

impl ConfigOverrides {
    fn apply(self, mut config: WidgetConfig) -> WidgetConfig {
        if let Some(title) = self.title {
            config.title = Some(title);
        }
        if let Some(interval) = self.refresh_interval {
            config.refresh_interval = interval;
        }
        config
    }
}

/// Body of `GET /api/dashboard/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStatus {
    pub status: &'static str,
    pub modules: Vec<String>,
    pub widgets: usize,
}

struct Entry<P> {
    descriptor: WidgetDescriptor,
    provider: P,
}

/// Ordered set of named providers.
pub struct WidgetCatalog<P> {
    entries: Vec<Entry<P>>,
}

impl<P> Default for WidgetCatalog<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<P: WidgetProvider + Send + Sync> WidgetCatalog<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateWidget`] if `name` is taken.
    pub fn register(
        &mut self,
        name: WidgetName,
        provider: P,
        overrides: ConfigOverrides,
    ) -> Result<(), DashError> {
        if self.entries.iter().any(|e| e.descriptor.name == name) {
            return Err(ValidationError::DuplicateWidget(name.to_string()).into());
        }
        let config = overrides.apply(provider.default_config());
        tracing::debug!(widget = %name, kind = %config.kind, "widget registered");
        self.entries.push(Entry {
            descriptor: WidgetDescriptor::new(name, config),
            provider,
        });
        Ok(())
    }

    /// Envelope for the widget called `name`.
    ///
    /// Never fails: provider errors and unknown names become failure
    /// envelopes.
    pub async fn fetch(&self, name: &str) -> WidgetEnvelope {
        let Some(entry) = self.entries.iter().find(|e| e.descriptor.name.as_str() == name)
        else {
            tracing::debug!(widget = name, "unknown widget requested");
            return WidgetEnvelope::failure(NOT_FOUND_MESSAGE);
        };
        match entry.provider.fetch_data().await {
            Ok(data) => WidgetEnvelope::success(data),
            Err(err) => {
                tracing::warn!(widget = name, error = %err, "provider failed");
                WidgetEnvelope::failure(err.to_string())
            }
        }
    }

    /// Registered widgets, in registration order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<WidgetDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    #[must_use]
    pub fn status(&self) -> CatalogStatus {
        CatalogStatus {
            status: RUNNING,
            modules: self
                .entries
                .iter()
                .map(|e| e.descriptor.name.to_string())
                .collect(),
            widgets: self.entries.len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
