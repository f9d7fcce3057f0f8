use crate::data::DataSource;
use crate::ranking::{PointsConfig, SortKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_COUNTDOWN_TICK: &str = "1m";
pub const DEFAULT_CURRENCY: &str = "₽";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

fn default_countdown_tick() -> String {
    DEFAULT_COUNTDOWN_TICK.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Game document location: a file path or an http(s) URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Initial leaderboard sort
    #[serde(default)]
    pub sort: SortKey,

    /// How often the countdown to the next update is refreshed (humantime, e.g. "1m", "30s")
    #[serde(default = "default_countdown_tick")]
    pub countdown_tick: String,

    #[serde(default)]
    pub theme: ThemeMode,

    /// Suffix appended to money values
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub points: PointsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: None,
            sort: SortKey::default(),
            countdown_tick: default_countdown_tick(),
            theme: ThemeMode::default(),
            currency: default_currency(),
            points: PointsConfig::default(),
        }
    }
}

impl Config {
    pub fn data_source(&self) -> Option<DataSource> {
        self.data.as_deref().map(DataSource::parse)
    }

    /// Countdown refresh interval. Falls back to one minute when the value does not parse;
    /// `validate_config` reports that case at startup.
    pub fn countdown_interval(&self) -> Duration {
        humantime::parse_duration(&self.countdown_tick)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(Duration::from_secs(60))
    }
}
