//! HTTP API gateway for Outly.
//!
//! Exposes the weather-grounded chat endpoint, weather and forecast
//! pass-through routes, activity suggestions and a health check.
//!
//! Built on Axum; see [`api`] for the route list.

pub mod api;
pub mod error;

use axum::extract::DefaultBodyLimit;
use axum::{Router, http::HeaderValue, response::Json, routing::get};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, info, warn};

use outly_agent::{ConversationOrchestrator, GenerationSettings, RateGovernor};
use outly_weather::{OpenWeatherClient, WeatherService};

pub use error::ApiError;

/// Shared application state for the gateway.
pub struct AppState {
    pub orchestrator: ConversationOrchestrator,
    /// `None` when no weather API key is configured
    pub weather: Option<Arc<dyn WeatherService>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wire the orchestrator, provider and weather client from config.
    pub fn from_config(config: &outly_config::AppConfig) -> Self {
        let governor = Arc::new(RateGovernor::from_config(&config.rate_limit));

        let provider = outly_providers::router::build_from_config(config);
        if provider.is_none() {
            warn!("No LLM API key configured; /api/chat will answer 500");
        }

        let weather = OpenWeatherClient::from_config(&config.weather).map(|c| Arc::new(c) as Arc<dyn WeatherService>);
        if weather.is_none() {
            warn!("No weather API key configured; weather routes will answer 500");
        }

        Self {
            orchestrator: ConversationOrchestrator::new(governor, provider)
                .with_settings(GenerationSettings::from_config(config)),
            weather,
        }
    }
}

/// Build the full router.
///
/// Layers applied:
/// - CORS restricted to the configured origins
/// - Request body size limit
/// - HTTP trace logging
pub fn build_router(state: SharedState, gateway: &outly_config::GatewayConfig) -> Router {
    let origins: Vec<HeaderValue> = gateway
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::api_router(state))
        .layer(DefaultBodyLimit::max(gateway.body_limit_bytes))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Periodically drop expired rate windows so idle identities do not pile up.
pub fn spawn_rate_sweeper(governor: Arc<RateGovernor>, every: Duration) -> tokio::task::JoinHandle<()> {
    let every = every.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = governor.sweep_expired(chrono::Utc::now());
            if evicted > 0 {
                debug!(evicted, tracked = governor.tracked(), "Swept expired rate windows");
            }
        }
    })
}

/// Start the gateway HTTP server.
pub async fn start(config: outly_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = Arc::new(AppState::from_config(&config));
    let sweeper = spawn_rate_sweeper(
        state.orchestrator.governor().clone(),
        Duration::from_secs(config.rate_limit.sweep_interval_secs),
    );

    let app = build_router(state, &config.gateway);

    info!(
        addr = %addr,
        model = %config.model,
        limit = config.rate_limit.limit,
        window_ms = config.rate_limit.window_ms,
        "Gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let served = axum::serve(listener, app).await;
    sweeper.abort();
    served?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
