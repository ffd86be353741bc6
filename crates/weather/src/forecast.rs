//! Forecast payload types and per-day selection.

use outly_core::weather::{Condition, Wind};
use serde::{Deserialize, Serialize};

/// Entries whose timestamp text contains this are the daily representative.
const DAILY_SLOT: &str = "12:00:00";

/// Number of days shown in a daily forecast row.
pub const DAILY_DAYS: usize = 5;

/// The provider's forecast response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastData {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
}

/// One 3-hour forecast step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub dt: i64,

    /// Provider timestamp text, "YYYY-MM-DD HH:MM:SS" in UTC
    #[serde(default)]
    pub dt_txt: String,

    #[serde(default)]
    pub main: ForecastReadings,

    #[serde(default)]
    pub weather: Vec<Condition>,

    #[serde(default)]
    pub wind: Wind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastReadings {
    #[serde(default)]
    pub temp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

impl ForecastEntry {
    /// Headline condition group, or "" when the provider sent none.
    pub fn condition_main(&self) -> &str {
        self.weather.first().map(|c| c.main.as_str()).unwrap_or_default()
    }
}

/// Pick one entry per day: the midday slot, for at most [`DAILY_DAYS`] days.
pub fn daily_forecast(entries: &[ForecastEntry]) -> Vec<&ForecastEntry> {
    entries
        .iter()
        .filter(|e| e.dt_txt.contains(DAILY_SLOT))
        .take(DAILY_DAYS)
        .collect()
}
