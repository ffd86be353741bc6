//! Conversation orchestration: admit, ground, ask.

use std::sync::Arc;
use std::time::Duration;

use outly_core::{ConversationTurn, Error, Language, Provider, ProviderError, ProviderRequest, WeatherSnapshot};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::context::format_weather_context;
use crate::prompt::{build_messages, system_instruction};
use crate::rate_limit::{Admission, ClientIdentity, RateGovernor};

/// Reply used when the provider answers without any usable text.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";

/// Fixed generation parameters sent with every completion request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Deadline for the whole provider call
    pub timeout: Duration,
}

impl GenerationSettings {
    pub fn from_config(config: &outly_config::AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.upstream.timeout_secs),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".into(),
            temperature: 0.7,
            max_tokens: 500,
            timeout: Duration::from_secs(30),
        }
    }
}

/// One chat request as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatInput {
    pub message: String,

    #[serde(default)]
    pub history: Vec<ConversationTurn>,

    /// Current-conditions snapshot the client is looking at
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,

    #[serde(default)]
    pub language: Language,
}

impl ChatInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_weather(mut self, weather: Option<WeatherSnapshot>) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Reject input the provider could do nothing with.
    pub fn validate(&self) -> outly_core::Result<()> {
        if self.message.trim().is_empty() {
            return Err(Error::Validation("Message must not be empty".into()));
        }
        Ok(())
    }
}

/// A successful chat turn.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    /// The admission that let this request through, for rate headers
    pub admission: Admission,
}

/// Turns a user message into one grounded LLM request.
///
/// Holds no per-conversation state: history travels with every request.
/// The provider is optional so a server without an LLM key still starts
/// and answers chat requests with a configuration error.
pub struct ConversationOrchestrator {
    governor: Arc<RateGovernor>,
    provider: Option<Arc<dyn Provider>>,
    settings: GenerationSettings,
}

impl ConversationOrchestrator {
    pub fn new(governor: Arc<RateGovernor>, provider: Option<Arc<dyn Provider>>) -> Self {
        Self {
            governor,
            provider,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn governor(&self) -> &Arc<RateGovernor> {
        &self.governor
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Answer one chat request from `identity`.
    ///
    /// Admission happens first, so a request that fails later (missing key,
    /// provider error) still counts against the caller's budget.
    pub async fn respond(&self, identity: &ClientIdentity, input: ChatInput) -> outly_core::Result<ChatReply> {
        let now = chrono::Utc::now();
        let admission = self.governor.admit_at(identity, now);
        if !admission.allowed {
            debug!(reset_at = %admission.reset_at, "Chat request over budget");
            return Err(Error::RateLimited {
                retry_after_secs: admission.retry_after_secs(now),
                limit: admission.limit,
                reset_at: admission.reset_at,
            });
        }

        let Some(provider) = self.provider.as_ref() else {
            warn!("Chat request rejected: LLM API key not configured");
            return Err(Error::Config("Groq API key not configured".into()));
        };

        let context = format_weather_context(input.weather.as_ref());
        let system = system_instruction(&context, input.language);
        let messages = build_messages(system, &input.history, &input.message);

        debug!(
            client = %identity,
            provider = provider.name(),
            turns = messages.len(),
            remaining = admission.remaining,
            "Sending chat completion"
        );

        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages,
            temperature: self.settings.temperature,
            max_tokens: Some(self.settings.max_tokens),
        };

        let response = match tokio::time::timeout(self.settings.timeout, provider.complete(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(error = %e, provider = provider.name(), "LLM provider call failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(timeout = ?self.settings.timeout, "LLM provider call timed out");
                return Err(ProviderError::Timeout(format!(
                    "no response within {}s",
                    self.settings.timeout.as_secs()
                ))
                .into());
            }
        };

        let reply = match response.first_text() {
            Some(text) => text.to_string(),
            None => {
                warn!(model = %response.model, "Provider returned no usable text, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        };

        Ok(ChatReply { reply, admission })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use outly_core::{Message, ProviderResponse, Role};
    use std::sync::Mutex;

    /// Records every request and answers with a canned completion list.
    struct RecordingProvider {
        completions: Vec<String>,
        seen: Mutex<Vec<ProviderRequest>>,
    }

    impl RecordingProvider {
        fn replying(completions: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                completions: completions.iter().map(|s| s.to_string()).collect(),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> ProviderRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            self.seen.lock().unwrap().push(request);
            Ok(ProviderResponse {
                completions: self.completions.clone(),
                usage: None,
                model: "mock".into(),
            })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::ApiError {
                status_code: 503,
                message: "over capacity".into(),
            })
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl Provider for HangingProvider {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            std::future::pending().await
        }
    }

    fn orchestrator(provider: Option<Arc<dyn Provider>>, limit: u32) -> ConversationOrchestrator {
        ConversationOrchestrator::new(Arc::new(RateGovernor::new(limit, 60_000)), provider)
    }

    fn kyoto() -> WeatherSnapshot {
        serde_json::from_str(
            r#"{"name": "Kyoto", "main": {"temp": 21.4}, "weather": [{"main": "Clear", "description": "clear sky"}]}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn builds_grounded_request() {
        let provider = RecordingProvider::replying(&["Great day for a hike!"]);
        let orch = orchestrator(Some(provider.clone()), 20);

        let input = ChatInput::new("Where should I go?")
            .with_history(vec![
                ConversationTurn::user("Hi"),
                ConversationTurn::assistant("Hello!"),
            ])
            .with_weather(Some(kyoto()))
            .with_language(Language::Ja);

        let reply = orch.respond(&ClientIdentity::new("1.2.3.4"), input).await.unwrap();
        assert_eq!(reply.reply, "Great day for a hike!");
        assert_eq!(reply.admission.remaining, 19);

        let request = provider.last();
        assert_eq!(request.model, "llama-3.3-70b-versatile");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, Some(500));

        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
        assert!(request.messages[0].content.contains("clear sky"));
        assert!(request.messages[0].content.contains("21.4"));
        assert!(request.messages[0].content.contains("Japanese"));
        assert_eq!(request.messages[3], Message::user("Where should I go?"));
    }

    #[tokio::test]
    async fn missing_weather_is_stated() {
        let provider = RecordingProvider::replying(&["ok"]);
        let orch = orchestrator(Some(provider.clone()), 20);

        orch.respond(&ClientIdentity::unknown(), ChatInput::new("hi")).await.unwrap();
        assert!(provider.last().messages[0].content.contains("Weather data unavailable."));
    }

    #[tokio::test]
    async fn empty_completion_uses_fallback() {
        for completions in [&[][..], &["   "][..]] {
            let orch = orchestrator(Some(RecordingProvider::replying(completions)), 20);
            let reply = orch.respond(&ClientIdentity::unknown(), ChatInput::new("hi")).await.unwrap();
            assert_eq!(reply.reply, FALLBACK_REPLY);
        }
    }

    #[tokio::test]
    async fn rate_limited_after_budget() {
        let provider = RecordingProvider::replying(&["ok"]);
        let orch = orchestrator(Some(provider.clone()), 2);
        let id = ClientIdentity::new("9.9.9.9");

        orch.respond(&id, ChatInput::new("a")).await.unwrap();
        orch.respond(&id, ChatInput::new("b")).await.unwrap();
        let err = orch.respond(&id, ChatInput::new("c")).await.unwrap_err();

        match err {
            Error::RateLimited { retry_after_secs, limit, .. } => {
                assert!(retry_after_secs >= 1);
                assert_eq!(limit, 2);
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
        assert_eq!(provider.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_key_is_config_error_and_still_counts() {
        let orch = orchestrator(None, 1);
        let id = ClientIdentity::new("5.5.5.5");

        let err = orch.respond(&id, ChatInput::new("hi")).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = orch.respond(&id, ChatInput::new("hi")).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited { .. }));
    }

    #[tokio::test]
    async fn provider_failure_is_upstream() {
        let orch = orchestrator(Some(Arc::new(FailingProvider)), 20);
        let err = orch.respond(&ClientIdentity::unknown(), ChatInput::new("hi")).await.unwrap_err();

        match err {
            Error::Upstream { message, details } => {
                assert_eq!(message, "Failed to generate response");
                assert!(details.contains("over capacity"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_hits_deadline() {
        let orch = orchestrator(Some(Arc::new(HangingProvider)), 20).with_settings(GenerationSettings {
            timeout: Duration::from_secs(5),
            ..Default::default()
        });

        let err = orch.respond(&ClientIdentity::unknown(), ChatInput::new("hi")).await.unwrap_err();
        match err {
            Error::Upstream { message, .. } => assert_eq!(message, "LLM provider timed out"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_request_keeps_its_admission() {
        let hanging = orchestrator(Some(Arc::new(HangingProvider)), 5);
        let id = ClientIdentity::new("7.7.7.7");

        let abandoned = tokio::time::timeout(Duration::from_secs(1), hanging.respond(&id, ChatInput::new("hi"))).await;
        assert!(abandoned.is_err(), "caller gave up before the provider deadline");

        let next = hanging.governor().admit(&id);
        assert!(next.allowed);
        assert_eq!(next.remaining, 3);

        let provider = RecordingProvider::replying(&["still here"]);
        let orch = ConversationOrchestrator::new(hanging.governor().clone(), Some(provider.clone()));
        let reply = orch.respond(&id, ChatInput::new("again")).await.unwrap();
        assert_eq!(reply.reply, "still here");
        assert_eq!(reply.admission.remaining, 2);
        assert_eq!(provider.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn blank_message_fails_validation() {
        assert!(ChatInput::new("  \n").validate().is_err());
        assert!(ChatInput::new("hello").validate().is_ok());
    }

    #[test]
    fn input_deserializes_with_defaults() {
        let input: ChatInput = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(input.history.is_empty());
        assert!(input.weather.is_none());
        assert_eq!(input.language, Language::En);
    }
}
