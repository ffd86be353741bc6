//! Weather snapshot → one-sentence prompt context.

use outly_core::WeatherSnapshot;

/// Sentence used when no usable snapshot was supplied.
pub const WEATHER_UNAVAILABLE: &str = "Weather data unavailable.";

/// Render the snapshot as the sentence embedded in the system instruction.
///
/// A snapshot only counts when its headline condition has a description and
/// a temperature is present; anything less yields [`WEATHER_UNAVAILABLE`] so the model is
/// never handed half-filled placeholders. The temperature is printed as
/// received, without rounding.
pub fn format_weather_context(snapshot: Option<&WeatherSnapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return WEATHER_UNAVAILABLE.to_string();
    };
    let description = snapshot
        .condition()
        .map(|c| c.description.trim())
        .filter(|d| !d.is_empty());
    let (Some(description), Some(temp)) = (description, snapshot.temperature_c()) else {
        return WEATHER_UNAVAILABLE.to_string();
    };

    let location = snapshot.location_name().unwrap_or("unknown location");
    format!(
        "Current weather: {description}, Temp: {temp}°C, Location: {location}."
    )
}
