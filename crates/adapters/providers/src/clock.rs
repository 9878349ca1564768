//! Clock provider — the current time for a `digital` widget.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::{Value, json};

use dashdeck_app::ports::WidgetProvider;
use dashdeck_domain::error::ProviderError;
use dashdeck_domain::widget::{WidgetConfig, WidgetKind};

/// Default refresh period, in milliseconds.
pub const REFRESH_INTERVAL_MS: u64 = 1000;

/// Zone the clock shows: `utc`, `local` (the server's zone) or any IANA
/// name such as `Asia/Shanghai`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Timezone {
    #[default]
    Utc,
    Local,
    Named(Tz),
}

impl FromStr for Timezone {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("utc") {
            return Ok(Self::Utc);
        }
        if value.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        value
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| format!("unknown timezone {value:?}"))
    }
}

impl TryFrom<String> for Timezone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("UTC"),
            Self::Local => f.write_str("local"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

impl TimeFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::TwentyFourHour => "24h",
            Self::TwelveHour => "12h",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::TwentyFourHour => "%H:%M:%S",
            Self::TwelveHour => "%I:%M:%S %p",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    pub timezone: Timezone,
    pub format: TimeFormat,
}

#[derive(Debug, Clone, Default)]
pub struct ClockProvider {
    settings: ClockSettings,
}

impl ClockProvider {
    #[must_use]
    pub fn new(settings: ClockSettings) -> Self {
        Self { settings }
    }

    /// Payload for the instant `now`.
    #[must_use]
    pub fn data_at<Tz>(&self, now: &DateTime<Tz>) -> Value
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        json!({
            "time": now.format(self.settings.format.pattern()).to_string(),
            "date": now.format("%Y-%m-%d").to_string(),
            "weekday": now.format("%A").to_string(),
            "timezone": self.settings.timezone.to_string(),
            "format": self.settings.format.as_str(),
        })
    }
}

impl WidgetProvider for ClockProvider {
    fn default_config(&self) -> WidgetConfig {
        WidgetConfig::new(WidgetKind::Digital, REFRESH_INTERVAL_MS).with_title("Clock")
    }

    async fn fetch_data(&self) -> Result<Value, ProviderError> {
        Ok(match self.settings.timezone {
            Timezone::Utc => self.data_at(&Utc::now()),
            Timezone::Local => self.data_at(&Local::now()),
            Timezone::Named(tz) => self.data_at(&Utc::now().with_timezone(&tz)),
        })
    }
}
