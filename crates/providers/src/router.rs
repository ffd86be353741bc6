//! Provider construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use outly_core::provider::Provider;
use tracing::info;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the LLM provider described by `config`.
///
/// Returns `None` when no credential is configured. The orchestrator reports
/// that as a configuration error on each chat request.
pub fn build_from_config(config: &outly_config::AppConfig) -> Option<Arc<dyn Provider>> {
    let api_key = config
        .llm_api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())?;

    let name = provider_name(&config.llm_base_url);
    info!(provider = %name, model = %config.model, "LLM provider configured");

    // Client deadline trails the orchestrator deadline.
    let client_timeout = Duration::from_secs(config.upstream.timeout_secs + 5);

    Some(Arc::new(OpenAiCompatProvider::with_timeout(
        name,
        &config.llm_base_url,
        api_key,
        client_timeout,
    )))
}

/// Derive a short provider name from its base URL host.
pub fn provider_name(base_url: &str) -> &'static str {
    if base_url.contains("groq.com") {
        "groq"
    } else if base_url.contains("openai.com") {
        "openai"
    } else if base_url.contains("openrouter.ai") {
        "openrouter"
    } else if base_url.contains("localhost") || base_url.contains("127.0.0.1") {
        "local"
    } else {
        "custom"
    }
}
