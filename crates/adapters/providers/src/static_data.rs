//! Static provider — a fixed payload, mostly useful for demos and tests.

use serde::Deserialize;
use serde_json::Value;

use dashdeck_app::ports::WidgetProvider;
use dashdeck_domain::error::ProviderError;
use dashdeck_domain::widget::{WidgetConfig, WidgetKind};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StaticSettings {
    /// Kind the payload is rendered as.
    #[serde(rename = "type", default)]
    pub kind: WidgetKind,
    #[serde(default = "empty_object")]
    pub data: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[derive(Debug, Clone)]
pub struct StaticProvider {
    settings: StaticSettings,
}

impl StaticProvider {
    #[must_use]
    pub fn new(settings: StaticSettings) -> Self {
        Self { settings }
    }
}

impl WidgetProvider for StaticProvider {
    fn default_config(&self) -> WidgetConfig {
        WidgetConfig::new(self.settings.kind, 0)
    }

    async fn fetch_data(&self) -> Result<Value, ProviderError> {
        Ok(self.settings.data.clone())
    }
}
