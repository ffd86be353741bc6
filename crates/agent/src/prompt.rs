//! System instruction, first-turn user prompts and the outbound turn sequence.

use outly_core::{ConversationTurn, Language, Message, WeatherSnapshot};

/// The Outly persona and behavioral contract, grounded in `weather_context`.
pub fn system_instruction(weather_context: &str, language: Language) -> String {
    let language = language.prompt_name();
    format!(
        r#"You are **"Outly"**, a friendly, knowledgeable outdoor activity guide.

Current Weather Context:
    {weather_context}

GOAL:
    Help users plan safe and enjoyable outdoor activities using real-time weather data.

RULES:
    1. **Tone:** Warm, enthusiastic, and practical.
    2. **Weather-Based Reasoning:** ALWAYS justify suggestions using temperature, wind, and conditions.
    3. **Safety First:** If weather is dangerous (storms, high wind, extreme heat/cold), clearly warn the user.
    4. **Scope Control:** Only discuss weather, travel, and outdoor activities. Politely redirect other topics.
    5. **Length:**
       - Normal responses: **max 5 lines**
       - Suggestion tasks: **3-4 bullet points**, concise but helpful
    6. **Language:** Respond ONLY in **{language}**

Do NOT:
    - Invent weather data
    - Give medical or unrelated advice
    - Exceed the response length limits
"#
    )
}

/// The user turn sent when someone picks a suggested activity.
///
/// Sent with empty history. `None` when the snapshot lacks a described
/// condition or a temperature.
pub fn activity_request(activity: &str, snapshot: &WeatherSnapshot, language: Language) -> Option<String> {
    let (description, temp) = headline(snapshot)?;
    let temp = round_half_up(temp);

    Some(match language {
        Language::En => format!(
            "I want to do \"{activity}\" today. The weather is {description} with {temp}°C. Please provide:
1. What should I bring/prepare?
2. Any tips or recommendations?
3. Should I need further assistance?"
        ),
        Language::Ja => format!(
            "今日「{activity}」をしたいです。天気は{description}で{temp}°Cです。以下を教えてください：
1. 何を持っていくべきですか？
2. アドバイスや推奨事項はありますか？
3. さらにサポートが必要ですか？"
        ),
    })
}

/// Wrap the opening question of a conversation with the conditions it is
/// asked under. Follow-up turns go out unwrapped.
pub fn weather_question(question: &str, snapshot: &WeatherSnapshot, language: Language) -> Option<String> {
    let (description, temp) = headline(snapshot)?;
    let feels = snapshot.feels_like_c().unwrap_or(temp);
    let location = snapshot.location_name().unwrap_or("unknown location");

    let mut conditions = format!(
        "- Temp: {}°C (Feels: {}°C)\n- Condition: {description}",
        round_half_up(temp),
        round_half_up(feels)
    );
    if let Some(speed) = snapshot.wind_speed_mps() {
        conditions.push_str(&format!("\n- Wind: {speed} m/s"));
    }

    Some(format!(
        "User is asking about weather and outdoor activities in {location}.

Current weather:
{conditions}

User question: \"{question}\"

Provide a helpful and friendly response in {} about weather-related activities, recommendations, or any weather information they need.",
        language.prompt_name()
    ))
}

fn headline(snapshot: &WeatherSnapshot) -> Option<(&str, f64)> {
    let description = snapshot
        .condition()
        .map(|c| c.description.trim())
        .filter(|d| !d.is_empty())?;
    Some((description, snapshot.temperature_c()?))
}

/// Nearest whole degree, halves toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// System instruction, then `history` in order, then `message` as the final
/// user turn. History roles were already normalized on deserialization:
/// anything other than `assistant` arrives here as a user turn.
pub fn build_messages(system: String, history: &[ConversationTurn], message: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system));
    messages.extend(history.iter().map(Message::from));
    messages.push(Message::user(message));
    messages
}
