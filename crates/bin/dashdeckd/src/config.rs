//! Configuration loading — TOML file, then environment variables, then
//! command-line flags.
//!
//! Reads the file named by `--config` or `DASHDECK_CONFIG`, which must
//! exist, or else `dashdeck.toml` in the working directory when present.
//! Every field has a sensible default so that last file is optional.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use dashdeck_adapter_providers::{ClockSettings, ProviderSpec};
use dashdeck_domain::widget::WidgetName;

use crate::cli::Cli;

/// Config file read when neither `--config` nor `DASHDECK_CONFIG` is given.
pub const DEFAULT_PATH: &str = "dashdeck.toml";

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Page settings.
    pub dashboard: DashboardConfig,
    /// Widgets, in display order.
    pub widgets: Vec<WidgetEntry>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// Auto-reload period of the page, in seconds.
    pub page_refresh_secs: u32,
    /// Where the dashboard fetches widget data from. Defaults to this server.
    pub api_base_url: Option<String>,
}

/// One `[[widgets]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetEntry {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub title: Option<String>,
    /// Refresh period in milliseconds, overriding the provider's default.
    pub refresh_interval: Option<u64>,
    #[serde(flatten)]
    pub provider: ProviderSpec,
}

fn enabled_by_default() -> bool {
    true
}

impl Config {
    /// Load the config file, apply environment overrides, then the flags
    /// in `cli`, and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, a file is
    /// malformed, or the result fails validation.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    fn resolve(cli: &Cli, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let explicit = cli
            .config
            .clone()
            .or_else(|| var("DASHDECK_CONFIG").map(PathBuf::from));
        let mut config = match &explicit {
            Some(path) => Self::from_file(path, true)?,
            None => Self::from_file(Path::new(DEFAULT_PATH), false)?,
        };
        config.apply_overrides(&var);
        config.apply_flags(cli);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                Ok(Self::default())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ConfigError::Missing(path.to_path_buf()))
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_flags(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("DASHDECK_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("DASHDECK_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("DASHDECK_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("DASHDECK_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("DASHDECK_API_BASE_URL") {
            self.dashboard.api_base_url = Some(val);
        }
        if let Some(val) = var("DASHDECK_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.dashboard.page_refresh_secs == 0 {
            return Err(ConfigError::Validation(
                "page_refresh_secs must be non-zero".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for entry in self.enabled_widgets() {
            if let Err(err) = WidgetName::new(entry.name.as_str()) {
                return Err(ConfigError::Validation(err.to_string()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "widget {:?} is declared more than once",
                    entry.name
                )));
            }
        }
        Ok(())
    }

    /// Widgets with `enabled = true`, in declaration order.
    pub fn enabled_widgets(&self) -> impl Iterator<Item = &WidgetEntry> {
        self.widgets.iter().filter(|entry| entry.enabled)
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Base URL of the widget API. Defaults to this server: its bind host,
    /// or loopback when bound to every interface.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        if let Some(url) = &self.dashboard.api_base_url {
            return url.clone();
        }
        let host = match self.server.host.as_str() {
            "" | "0.0.0.0" => "127.0.0.1".to_string(),
            "::" | "[::]" => "[::1]".to_string(),
            host if host.contains(':') && !host.starts_with('[') => format!("[{host}]"),
            host => host.to_string(),
        };
        format!("http://{host}:{}", self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            dashboard: DashboardConfig::default(),
            widgets: vec![
                WidgetEntry {
                    name: "clock".to_string(),
                    enabled: true,
                    title: None,
                    refresh_interval: None,
                    provider: ProviderSpec::Clock(ClockSettings::default()),
                },
                WidgetEntry {
                    name: "system".to_string(),
                    enabled: true,
                    title: None,
                    refresh_interval: None,
                    provider: ProviderSpec::System,
                },
            ],
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:dashdeck.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "dashdeckd=info,dashdeck=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Dashboard".to_string(),
            page_refresh_secs: 5,
            api_base_url: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config file named on the command line or in the environment is absent.
    #[error("config file {} does not exist", .0.display())]
    Missing(PathBuf),
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:dashdeck.db?mode=rwc");
        assert_eq!(config.dashboard.title, "Dashboard");
        assert_eq!(config.dashboard.page_refresh_secs, 5);
        let names: Vec<&str> = config.enabled_widgets().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["clock", "system"]);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.widgets.len(), 2);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r#"
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [dashboard]
            title = 'Office'
            page_refresh_secs = 30
            api_base_url = 'http://dash.local'

            [[widgets]]
            name = 'clock'
            provider = 'clock'
            format = '12h'
            title = 'Local time'

            [[widgets]]
            name = 'news'
            provider = 'static'
            type = 'list'
            refresh_interval = 60000
            data = { items = [{ title = 'Hello' }] }

            [[widgets]]
            name = 'system'
            provider = 'system'
            enabled = false
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.dashboard.title, "Office");
        assert_eq!(config.api_base_url(), "http://dash.local");

        let widgets: Vec<&WidgetEntry> = config.enabled_widgets().collect();
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].title.as_deref(), Some("Local time"));
        assert_eq!(widgets[0].provider.name(), "clock");
        assert_eq!(widgets[1].refresh_interval, Some(60_000));
        assert_eq!(widgets[1].provider.name(), "static");
        assert!(!config.widgets[2].enabled);
    }

    #[test]
    fn should_return_default_when_optional_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml"), false).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_fail_when_named_file_not_found() {
        let cli = Cli {
            config: Some(PathBuf::from("nonexistent-dashdeck.toml")),
            ..Cli::default()
        };
        let result = Config::resolve(&cli, env(&[]));
        assert!(matches!(result, Err(ConfigError::Missing(ref path)) if path.ends_with("nonexistent-dashdeck.toml")));

        let result = Config::resolve(&Cli::default(), env(&[("DASHDECK_CONFIG", "missing.toml")]));
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn should_prefer_flags_over_env_over_file() {
        let mut config: Config = toml::from_str(
            "
            [server]
            host = '10.0.0.1'
            port = 9090
            ",
        )
        .unwrap();
        config.apply_overrides(env(&[("DASHDECK_HOST", "10.0.0.2"), ("DASHDECK_PORT", "9191")]));
        assert_eq!(config.bind_addr(), "10.0.0.2:9191");

        config.apply_flags(&Cli {
            port: Some(8080),
            ..Cli::default()
        });
        assert_eq!(config.bind_addr(), "10.0.0.2:8080");

        config.apply_flags(&Cli {
            host: Some("127.0.0.1".to_string()),
            ..Cli::default()
        });
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn should_resolve_defaults_with_flags_applied() {
        let cli = Cli {
            host: Some("192.168.1.20".to_string()),
            port: Some(4040),
            ..Cli::default()
        };
        let config = Config::resolve(&cli, env(&[("DASHDECK_PORT", "5050")])).unwrap();
        assert_eq!(config.bind_addr(), "192.168.1.20:4040");
        assert_eq!(config.api_base_url(), "http://192.168.1.20:4040");
    }

    #[test]
    fn should_reject_zero_port_given_as_flag() {
        let cli = Cli {
            port: Some(0),
            ..Cli::default()
        };
        assert!(matches!(
            Config::resolve(&cli, env(&[])),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_derive_api_base_url_from_bind_host() {
        let mut config = Config::default();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:3000");

        config.server.host = "10.1.2.3".to_string();
        assert_eq!(config.api_base_url(), "http://10.1.2.3:3000");

        config.server.host = "::".to_string();
        assert_eq!(config.api_base_url(), "http://[::1]:3000");

        config.server.host = "fd00::7".to_string();
        assert_eq!(config.api_base_url(), "http://[fd00::7]:3000");

        config.dashboard.api_base_url = Some("http://dash.local".to_string());
        assert_eq!(config.api_base_url(), "http://dash.local");
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("DASHDECK_BIND", "127.0.0.1:4000"),
            ("DASHDECK_DATABASE_URL", "sqlite::memory:"),
            ("DASHDECK_LOG", "warn"),
        ]));

        assert_eq!(config.bind_addr(), "127.0.0.1:4000");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.api_base_url(), "http://127.0.0.1:4000");
    }

    #[test]
    fn should_prefer_rust_log_over_dashdeck_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("DASHDECK_LOG", "warn"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparseable_port_override() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("DASHDECK_PORT", "http")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_reject_invalid_widget_name() {
        let mut config = Config::default();
        config.widgets[0].name = "my clock".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_duplicate_enabled_widgets() {
        let mut config = Config::default();
        config.widgets[1].name = "clock".to_string();
        assert!(config.validate().is_err());

        config.widgets[1].enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_unknown_provider() {
        let result: Result<Config, _> = toml::from_str(
            "
            [[widgets]]
            name = 'weather'
            provider = 'weather'
            ",
        );
        assert!(result.is_err());
    }
}
