//! HTTP client for the weather provider.

use std::time::Duration;

use async_trait::async_trait;
use outly_core::{Language, WeatherError};
use tracing::{debug, warn};

use crate::query::LocationQuery;

/// Source of raw weather JSON.
///
/// The gateway talks to this trait so tests can swap in canned payloads.
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Current conditions, in the provider's "current weather" shape.
    async fn current(
        &self,
        query: &LocationQuery,
        language: Language,
    ) -> Result<serde_json::Value, WeatherError>;

    /// 5-day forecast in 3-hour steps, in the provider's forecast shape.
    async fn forecast(
        &self,
        query: &LocationQuery,
        language: Language,
    ) -> Result<serde_json::Value, WeatherError>;
}

/// Client for OpenWeatherMap's `weather` and `forecast` endpoints.
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Build a client from the `[weather]` config section. `None` without a key.
    pub fn from_config(config: &outly_config::WeatherConfig) -> Option<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())?;
        Some(Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    fn params(&self, query: &LocationQuery, language: Language) -> Vec<(&'static str, String)> {
        let mut params = query.to_query_pairs();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".into()));
        params.push(("lang", language.code().into()));
        params
    }

    async fn fetch(
        &self,
        endpoint: &str,
        query: &LocationQuery,
        language: Language,
    ) -> Result<serde_json::Value, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(endpoint, location = %query, lang = %language, "Fetching weather");

        let response = self
            .client
            .get(&url)
            .query(&self.params(query, language))
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), endpoint, "Weather provider returned error");
            return Err(WeatherError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    async fn current(
        &self,
        query: &LocationQuery,
        language: Language,
    ) -> Result<serde_json::Value, WeatherError> {
        self.fetch("weather", query, language).await
    }

    async fn forecast(
        &self,
        query: &LocationQuery,
        language: Language,
    ) -> Result<serde_json::Value, WeatherError> {
        self.fetch("forecast", query, language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_key() {
        let config = outly_config::WeatherConfig::default();
        assert!(OpenWeatherClient::from_config(&config).is_none());

        let config = outly_config::WeatherConfig {
            api_key: Some("owm-test".into()),
            ..Default::default()
        };
        let client = OpenWeatherClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "https://api.openweathermap.org/data/2.5");
    }

    #[test]
    fn params_are_metric_and_localized() {
        let client = OpenWeatherClient::new("http://localhost/", "k", Duration::from_secs(1));
        let params = client.params(&LocationQuery::Named("Sapporo".into()), Language::Ja);
        assert!(params.contains(&("q", "Sapporo".to_string())));
        assert!(params.contains(&("units", "metric".to_string())));
        assert!(params.contains(&("lang", "ja".to_string())));
        assert!(params.contains(&("appid", "k".to_string())));
        assert_eq!(client.base_url, "http://localhost");
    }
}
