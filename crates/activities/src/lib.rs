//! Deterministic activity recommendations.
//!
//! A weather reading is bucketed into a [`WeatherCategory`] by
//! [`classify`], and the category selects a fixed, translated set of five
//! suggestions from the static [`catalog`].

pub mod catalog;
pub mod classifier;

pub use catalog::{ActivitySuggestion, SUGGESTIONS_PER_CATEGORY, lookup};
pub use classifier::{WeatherCategory, classify};

use outly_core::Language;

/// Classify a reading and return its suggestions in display order.
pub fn suggest(
    condition: &str,
    temperature_c: f64,
    wind_speed_mps: f64,
    language: Language,
) -> (WeatherCategory, &'static [ActivitySuggestion; SUGGESTIONS_PER_CATEGORY]) {
    let category = classify(condition, temperature_c, wind_speed_mps);
    (category, lookup(category, language))
}
