//! `outly activities`: Print suggestions for a weather reading, and
//! optionally ask the advisor how to go about one of them.

use std::sync::Arc;

use outly_agent::{ChatInput, ClientIdentity, ConversationOrchestrator, GenerationSettings, RateGovernor, activity_request};
use outly_config::AppConfig;
use outly_core::weather::{Condition, MainReadings, Wind};
use outly_core::{Language, WeatherSnapshot};

pub async fn run(
    condition: &str,
    temp: f64,
    wind: f64,
    lang: Language,
    ask: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !temp.is_finite() || !wind.is_finite() {
        return Err("Temperature and wind must be finite numbers".into());
    }

    let (category, activities) = outly_activities::suggest(condition, temp, wind, lang);

    println!("  Category: {category}");
    println!();
    for (i, activity) in activities.iter().enumerate() {
        println!("  {}. {} [{}]: {}", i + 1, activity.name, activity.icon_ref, activity.condition_note);
    }

    let Some(choice) = ask else {
        return Ok(());
    };
    let activity = choice
        .checked_sub(1)
        .and_then(|i| activities.get(i))
        .ok_or_else(|| format!("--ask must be between 1 and {}", activities.len()))?;

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let orchestrator = ConversationOrchestrator::new(
        Arc::new(RateGovernor::from_config(&config.rate_limit)),
        outly_providers::router::build_from_config(&config),
    )
    .with_settings(GenerationSettings::from_config(&config));

    let reply = ask_about(&orchestrator, activity.name, &reading(condition, temp, wind), lang).await;
    println!();
    for text in reply.lines() {
        println!("  Outly > {text}");
    }

    Ok(())
}

/// The command-line reading as a snapshot, so the advisor is grounded in it.
fn reading(condition: &str, temp: f64, wind: f64) -> WeatherSnapshot {
    WeatherSnapshot {
        main: Some(MainReadings {
            temp: Some(temp),
            ..Default::default()
        }),
        weather: vec![Condition {
            main: condition.to_string(),
            description: condition.to_string(),
        }],
        wind: Some(Wind { speed: wind }),
        ..Default::default()
    }
}

/// One fresh conversation about `activity`; failures become the apology.
async fn ask_about(
    orchestrator: &ConversationOrchestrator,
    activity: &str,
    snapshot: &WeatherSnapshot,
    lang: Language,
) -> String {
    let Some(prompt) = activity_request(activity, snapshot, lang) else {
        return lang.error_apology().to_string();
    };
    let input = ChatInput::new(prompt)
        .with_weather(Some(snapshot.clone()))
        .with_language(lang);

    match orchestrator.respond(&ClientIdentity::new("local"), input).await {
        Ok(reply) => reply.reply,
        Err(e) => {
            tracing::warn!(error = %e, activity, "Activity request failed");
            lang.error_apology().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use outly_core::{Provider, ProviderError, ProviderRequest, ProviderResponse, Role};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture {
        seen: Mutex<Vec<ProviderRequest>>,
    }

    #[async_trait]
    impl Provider for Capture {
        fn name(&self) -> &str {
            "capture"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            self.seen.lock().unwrap().push(request);
            Ok(ProviderResponse {
                completions: vec!["Bring an umbrella.".into()],
                usage: None,
                model: "capture".into(),
            })
        }
    }

    #[tokio::test]
    async fn asks_about_the_chosen_activity_without_history() {
        let provider = Arc::new(Capture::default());
        let orch = ConversationOrchestrator::new(Arc::new(RateGovernor::default()), Some(provider.clone()));

        let reply = ask_about(&orch, "Museum Visit", &reading("light rain", 14.6, 2.0), Language::En).await;
        assert_eq!(reply, "Bring an umbrella.");

        let seen = provider.seen.lock().unwrap();
        let roles: Vec<Role> = seen[0].messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
        assert!(seen[0].messages[0].content.contains("light rain, Temp: 14.6°C"));
        assert!(seen[0].messages[1].content.starts_with("I want to do \"Museum Visit\" today. The weather is light rain with 15°C."));
    }

    #[tokio::test]
    async fn missing_key_prints_apology() {
        let orch = ConversationOrchestrator::new(Arc::new(RateGovernor::default()), None);
        let reply = ask_about(&orch, "水泳", &reading("clear sky", 30.0, 1.0), Language::Ja).await;
        assert_eq!(reply, "申し訳ありません。エラーが発生しました。");
    }
}
