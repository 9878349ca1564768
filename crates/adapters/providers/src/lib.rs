//! # dashdeck-adapter-providers
//!
//! Server-side producers of widget data, served on `GET /api/widget/{name}`.
//!
//! ## Providers
//! - [`clock`] — current time as a `digital` widget
//! - [`news`] — latest feed entries as a `list` widget
//! - [`system`] — CPU, memory, disk and network usage as a `card` widget
//! - [`static_data`] — a fixed payload of any kind
//!
//! [`ProviderSpec`] is the configuration form of a provider; the binary
//! builds a [`BuiltinProvider`] from each configured widget.

pub mod clock;
pub mod news;
pub mod static_data;
pub mod system;

use serde::Deserialize;
use serde_json::Value;

use dashdeck_app::ports::WidgetProvider;
use dashdeck_domain::error::ProviderError;
use dashdeck_domain::widget::WidgetConfig;

pub use clock::{ClockProvider, ClockSettings, Timezone};
pub use news::{NewsProvider, NewsSettings};
pub use static_data::{StaticProvider, StaticSettings};
pub use system::SystemProvider;

/// Provider selection and settings, tagged by `provider`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderSpec {
    Clock(ClockSettings),
    News(NewsSettings),
    System,
    Static(StaticSettings),
}

impl ProviderSpec {
    /// Name of the provider, as written in configuration.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clock(_) => "clock",
            Self::News(_) => "news",
            Self::System => "system",
            Self::Static(_) => "static",
        }
    }

    /// # Errors
    ///
    /// Returns [`ProviderError`] when the provider cannot be set up.
    pub fn build(self) -> Result<BuiltinProvider, ProviderError> {
        Ok(match self {
            Self::Clock(settings) => BuiltinProvider::Clock(ClockProvider::new(settings)),
            Self::News(settings) => BuiltinProvider::News(NewsProvider::new(settings)?),
            Self::System => BuiltinProvider::System(SystemProvider::new()),
            Self::Static(settings) => BuiltinProvider::Static(StaticProvider::new(settings)),
        })
    }
}

/// Any of the providers shipped with dashdeck.
pub enum BuiltinProvider {
    Clock(ClockProvider),
    News(NewsProvider),
    System(SystemProvider),
    Static(StaticProvider),
}

impl WidgetProvider for BuiltinProvider {
    fn default_config(&self) -> WidgetConfig {
        match self {
            Self::Clock(inner) => inner.default_config(),
            Self::News(inner) => inner.default_config(),
            Self::System(inner) => inner.default_config(),
            Self::Static(inner) => inner.default_config(),
        }
    }

    async fn fetch_data(&self) -> Result<Value, ProviderError> {
        match self {
            Self::Clock(inner) => inner.fetch_data().await,
            Self::News(inner) => inner.fetch_data().await,
            Self::System(inner) => inner.fetch_data().await,
            Self::Static(inner) => inner.fetch_data().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashdeck_domain::widget::WidgetKind;

    #[test]
    fn should_parse_provider_tag_with_settings() {
        let spec: ProviderSpec = toml::from_str(
            r#"
provider = "clock"
timezone = "local"
format = "12h"
"#,
        )
        .unwrap();

        assert_eq!(spec.name(), "clock");
        assert!(matches!(spec, ProviderSpec::Clock(ref s) if s.format == clock::TimeFormat::TwelveHour));
    }

    #[test]
    fn should_parse_named_timezone() {
        let spec: ProviderSpec = toml::from_str(
            r#"
provider = "clock"
timezone = "Asia/Shanghai"
"#,
        )
        .unwrap();
        let ProviderSpec::Clock(settings) = spec else {
            panic!("expected clock settings");
        };
        assert_eq!(settings.timezone, Timezone::Named(chrono_tz::Asia::Shanghai));
    }

    #[test]
    fn should_reject_unknown_timezone() {
        let result: Result<ProviderSpec, _> = toml::from_str(
            r#"
provider = "clock"
timezone = "Nowhere/Land"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn should_parse_news_provider_with_defaults() {
        let spec: ProviderSpec = toml::from_str(
            r#"
provider = "news"
max_items = 3
"#,
        )
        .unwrap();

        assert_eq!(spec.name(), "news");
        let ProviderSpec::News(settings) = &spec else {
            panic!("expected news settings");
        };
        assert_eq!(settings.source, "tech");
        assert_eq!(settings.max_items, 3);

        let provider = spec.build().unwrap();
        assert_eq!(provider.default_config().kind, WidgetKind::List);
    }

    #[test]
    fn should_parse_system_provider_without_settings() {
        let spec: ProviderSpec = toml::from_str(r#"provider = "system""#).unwrap();
        assert_eq!(spec, ProviderSpec::System);
    }

    #[test]
    fn should_reject_unknown_provider() {
        let result: Result<ProviderSpec, _> = toml::from_str(r#"provider = "weather""#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn should_delegate_to_inner_provider() {
        let spec: ProviderSpec = toml::from_str(
            r#"
provider = "static"
type = "list"
data = { items = [] }
"#,
        )
        .unwrap();
        let provider = spec.build().unwrap();

        assert_eq!(provider.default_config().kind, WidgetKind::List);
        assert_eq!(
            provider.fetch_data().await.unwrap(),
            serde_json::json!({"items": []})
        );
    }
}
