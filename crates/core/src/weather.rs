//! Point-in-time weather readings.
//!
//! [`WeatherSnapshot`] mirrors the JSON the weather provider returns for
//! "current weather", so clients can forward the payload they already have.
//! Every field is optional on the wire: a half-filled snapshot must still
//! deserialize, and consumers decide what they need from it. Explicit
//! `null` is read the same as an absent key.

use serde::{Deserialize, Deserializer, Serialize};

/// One weather reading for a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Location name as resolved by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MainReadings>,

    /// Condition entries; the first one is the headline condition
    #[serde(default, deserialize_with = "conditions")]
    pub weather: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<Wind>,

    /// Visibility in metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    /// Temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,

    /// Relative humidity in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Coarse group, e.g. "Rain", "Clouds"
    #[serde(default, deserialize_with = "null_as_default")]
    pub main: String,

    /// Localized description, e.g. "light rain"
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Speed in m/s
    #[serde(default, deserialize_with = "null_as_default")]
    pub speed: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` list → empty, `null` entries dropped.
fn conditions<'de, D>(deserializer: D) -> Result<Vec<Condition>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Option<Condition>>> = Option::deserialize(deserializer)?;
    Ok(entries.unwrap_or_default().into_iter().flatten().collect())
}

impl WeatherSnapshot {
    /// The headline condition, if the provider sent any.
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    pub fn temperature_c(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.temp)
    }

    pub fn feels_like_c(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.feels_like)
    }

    pub fn humidity_pct(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.humidity)
    }

    pub fn wind_speed_mps(&self) -> Option<f64> {
        self.wind.as_ref().map(|w| w.speed)
    }

    pub fn location_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_payload() {
        let json = r#"{
            "name": "Kyoto",
            "main": {"temp": 21.4, "feels_like": 20.9, "humidity": 55, "pressure": 1012},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "wind": {"speed": 3.1, "deg": 200},
            "visibility": 10000
        }"#;
        let snap: WeatherSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.location_name(), Some("Kyoto"));
        assert_eq!(snap.temperature_c(), Some(21.4));
        assert_eq!(snap.humidity_pct(), Some(55.0));
        assert_eq!(snap.wind_speed_mps(), Some(3.1));
        assert_eq!(snap.condition().unwrap().description, "clear sky");
        assert_eq!(snap.visibility, Some(10000.0));
    }

    #[test]
    fn partial_payload_still_parses() {
        let snap: WeatherSnapshot = serde_json::from_str(r#"{"name": "Oslo"}"#).unwrap();
        assert!(snap.condition().is_none());
        assert!(snap.temperature_c().is_none());
        assert!(snap.wind_speed_mps().is_none());
    }

    #[test]
    fn explicit_nulls_read_as_missing() {
        let snap: WeatherSnapshot = serde_json::from_str(
            r#"{"name": null, "main": {"temp": null}, "weather": null, "wind": {"speed": null}}"#,
        )
        .unwrap();
        assert!(snap.location_name().is_none());
        assert!(snap.temperature_c().is_none());
        assert!(snap.condition().is_none());
        assert_eq!(snap.wind_speed_mps(), Some(0.0));

        let snap: WeatherSnapshot = serde_json::from_str(
            r#"{"weather": [null, {"main": null, "description": null}], "main": null, "wind": null}"#,
        )
        .unwrap();
        assert_eq!(snap.weather.len(), 1);
        assert_eq!(snap.condition().unwrap().description, "");
        assert!(snap.wind_speed_mps().is_none());
    }

    #[test]
    fn blank_name_counts_as_missing() {
        let snap = WeatherSnapshot {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(snap.location_name(), None);
    }
}
