//! Weather data collaborator for Outly.
//!
//! Fetches current conditions and 5-day/3-hour forecasts from an
//! OpenWeatherMap-compatible API. Payloads are passed through as JSON; the
//! only shaping done here is validating the location query and picking one
//! forecast entry per day.

pub mod client;
pub mod forecast;
pub mod query;

pub use client::{OpenWeatherClient, WeatherService};
pub use forecast::{ForecastData, ForecastEntry, daily_forecast};
pub use query::LocationQuery;
