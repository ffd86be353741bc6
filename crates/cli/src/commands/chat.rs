//! `outly chat`: Interactive or single-message chat with the advisor.
//!
//! Runs the orchestrator in-process as a client would use it: history lives
//! in this loop, the opening question is framed with the live conditions, a
//! failed weather lookup leaves the conversation ungrounded, and a failed turn
//! prints the language's apology instead of aborting.

use std::io::Write;
use std::sync::Arc;

use outly_agent::{
    ChatInput, ClientIdentity, ConversationOrchestrator, GenerationSettings, RateGovernor, weather_question,
};
use outly_config::AppConfig;
use outly_core::{ConversationTurn, Language, WeatherSnapshot};
use outly_weather::{LocationQuery, OpenWeatherClient, WeatherService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

pub async fn run(
    message: Option<String>,
    location: Option<String>,
    lang: Language,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_llm_key() {
        eprintln!();
        eprintln!("  ERROR: No LLM API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GROQ_API_KEY=gsk_...");
        eprintln!("    OUTLY_LLM_API_KEY=...");
        eprintln!();
        eprintln!("  Or add llm_api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No LLM API key found. See above for setup instructions.".into());
    }

    let weather = match location.as_deref() {
        Some(place) => fetch_snapshot(&config, place, lang).await,
        None => None,
    };

    let orchestrator = ConversationOrchestrator::new(
        Arc::new(RateGovernor::from_config(&config.rate_limit)),
        outly_providers::router::build_from_config(&config),
    )
    .with_settings(GenerationSettings::from_config(&config));
    let identity = ClientIdentity::new("local");
    let mut history: Vec<ConversationTurn> = Vec::new();

    if let Some(msg) = message {
        let reply = converse(&orchestrator, &identity, &mut history, &msg, weather.clone(), lang).await;
        println!("{reply}");
        return Ok(());
    }

    println!();
    println!("  ⛅ Outly: Interactive Mode");
    println!();
    println!("  Model:     {}", config.model);
    println!("  Language:  {}", lang.prompt_name());
    match (&location, &weather) {
        (Some(place), Some(_)) => println!("  Weather:   {place} (live)"),
        (Some(place), None) => println!("  Weather:   {place} (unavailable)"),
        _ => println!("  Weather:   none, pass --location to ground answers"),
    }
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        eprint!("  ...");
        let reply = converse(&orchestrator, &identity, &mut history, line, weather.clone(), lang).await;
        eprint!("\r     \r");
        println!();
        for text in reply.lines() {
            println!("  Outly > {text}");
        }
        println!();
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

/// Current conditions for `place`, or `None` on any failure.
async fn fetch_snapshot(config: &AppConfig, place: &str, lang: Language) -> Option<WeatherSnapshot> {
    let Some(client) = OpenWeatherClient::from_config(&config.weather) else {
        warn!("No weather API key configured; chatting without weather context");
        return None;
    };
    let query = LocationQuery::Named(place.to_string());

    match client.current(&query, lang).await {
        Ok(raw) => serde_json::from_value(raw)
            .map_err(|e| warn!(error = %e, "Unreadable weather payload"))
            .ok(),
        Err(e) => {
            warn!(error = %e, location = %place, "Weather lookup failed");
            None
        }
    }
}

/// Send one turn. Successful exchanges are appended to `history`; failures
/// yield the apology text and leave history untouched.
///
/// With live weather, the first turn goes out wrapped in a description of the
/// conditions, while history keeps the question as typed.
async fn converse(
    orchestrator: &ConversationOrchestrator,
    identity: &ClientIdentity,
    history: &mut Vec<ConversationTurn>,
    message: &str,
    weather: Option<WeatherSnapshot>,
    lang: Language,
) -> String {
    let framed = match (&weather, history.is_empty()) {
        (Some(snapshot), true) => weather_question(message, snapshot, lang),
        _ => None,
    };
    let input = ChatInput::new(framed.as_deref().unwrap_or(message))
        .with_history(history.clone())
        .with_weather(weather)
        .with_language(lang);

    match orchestrator.respond(identity, input).await {
        Ok(reply) => {
            history.push(ConversationTurn::user(message));
            history.push(ConversationTurn::assistant(reply.reply.clone()));
            reply.reply
        }
        Err(e) => {
            warn!(error = %e, "Chat turn failed");
            lang.error_apology().to_string()
        }
    }
}
