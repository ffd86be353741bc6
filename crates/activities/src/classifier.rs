//! Weather → category classification.

use serde::{Deserialize, Serialize};

/// Below this temperature (°C) a dry day counts as cold.
pub const COLD_BELOW_C: f64 = 10.0;

/// At or above this temperature (°C) a dry day counts as hot.
pub const HOT_FROM_C: f64 = 25.0;

/// Coarse weather bucket used to pick activity suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Rain,
    Cold,
    Hot,
    Mild,
}

impl WeatherCategory {
    /// Every category, in catalog row order.
    pub const ALL: [WeatherCategory; 4] = [
        WeatherCategory::Rain,
        WeatherCategory::Cold,
        WeatherCategory::Hot,
        WeatherCategory::Mild,
    ];

    pub fn index(self) -> usize {
        match self {
            WeatherCategory::Rain => 0,
            WeatherCategory::Cold => 1,
            WeatherCategory::Hot => 2,
            WeatherCategory::Mild => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeatherCategory::Rain => "rain",
            WeatherCategory::Cold => "cold",
            WeatherCategory::Hot => "hot",
            WeatherCategory::Mild => "mild",
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a reading. First matching rule wins:
///
/// 1. condition mentions rain or drizzle (any case) → `Rain`
/// 2. below [`COLD_BELOW_C`] → `Cold`
/// 3. at or above [`HOT_FROM_C`] → `Hot`
/// 4. otherwise → `Mild`
///
/// Wind speed is accepted but does not affect the result yet. A NaN
/// temperature fails both comparisons and lands in `Mild`.
pub fn classify(condition: &str, temperature_c: f64, _wind_speed_mps: f64) -> WeatherCategory {
    let condition = condition.to_lowercase();

    if condition.contains("rain") || condition.contains("drizzle") {
        WeatherCategory::Rain
    } else if temperature_c < COLD_BELOW_C {
        WeatherCategory::Cold
    } else if temperature_c >= HOT_FROM_C {
        WeatherCategory::Hot
    } else {
        WeatherCategory::Mild
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_beats_cold() {
        assert_eq!(classify("light rain", 5.0, 2.0), WeatherCategory::Rain);
    }

    #[test]
    fn temperature_rules() {
        assert_eq!(classify("clear", 5.0, 0.0), WeatherCategory::Cold);
        assert_eq!(classify("clear", 30.0, 0.0), WeatherCategory::Hot);
        assert_eq!(classify("clouds", 18.0, 3.0), WeatherCategory::Mild);
    }

    #[test]
    fn thresholds_are_exact() {
        assert_eq!(classify("clear", 9.99, 0.0), WeatherCategory::Cold);
        assert_eq!(classify("clear", 10.0, 0.0), WeatherCategory::Mild);
        assert_eq!(classify("clear", 24.99, 0.0), WeatherCategory::Mild);
        assert_eq!(classify("clear", 25.0, 0.0), WeatherCategory::Hot);
    }

    #[test]
    fn condition_match_ignores_case() {
        assert_eq!(classify("Heavy RAIN", 30.0, 0.0), WeatherCategory::Rain);
        assert_eq!(classify("DRIZZLE", 20.0, 0.0), WeatherCategory::Rain);
        assert_eq!(classify("Thunderstorm", 20.0, 0.0), WeatherCategory::Mild);
    }

    #[test]
    fn wind_does_not_change_category() {
        assert_eq!(classify("clear", 18.0, 0.0), classify("clear", 18.0, 40.0));
    }

    #[test]
    fn nan_temperature_is_mild() {
        assert_eq!(classify("clear", f64::NAN, 0.0), WeatherCategory::Mild);
    }
}
