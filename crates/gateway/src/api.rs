//! `/api` routes.
//!
//! - `POST /api/chat`            weather-grounded chat, rate limited per client
//! - `GET  /api/weather`         current conditions (pass-through JSON)
//! - `GET  /api/forecast`        5-day / 3-hour forecast (pass-through JSON)
//! - `GET  /api/forecast/daily`  one midday entry per day
//! - `GET  /api/activities`      activity suggestions for a reading

use axum::{
    Router,
    extract::rejection::JsonRejection,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use outly_activities::{ActivitySuggestion, WeatherCategory};
use outly_agent::{ChatInput, ClientIdentity};
use outly_core::{Error, Language};
use outly_weather::{ForecastData, ForecastEntry, LocationQuery, daily_forecast};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, info_span, warn};

use crate::SharedState;
use crate::error::{ApiError, rate_headers};

pub fn api_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/weather", get(weather_handler))
        .route("/forecast", get(forecast_handler))
        .route("/forecast/daily", get(daily_forecast_handler))
        .route("/activities", get(activities_handler))
        .with_state(state)
}

// ── Chat ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

fn client_identity(headers: &HeaderMap) -> ClientIdentity {
    ClientIdentity::from_forwarded_for(
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok()),
    )
}

async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<ChatInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let identity = client_identity(&headers);
    let span = info_span!("chat", request_id = %uuid::Uuid::new_v4());
    handle_chat(state, identity, payload).instrument(span).await
}

async fn handle_chat(
    state: SharedState,
    identity: ClientIdentity,
    payload: Result<Json<ChatInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    // Unparseable bodies never reach the governor.
    let Json(input) = payload.map_err(|rejection| Error::Validation(rejection.body_text()))?;
    input.validate()?;

    info!(
        message_len = input.message.len(),
        history = input.history.len(),
        lang = %input.language,
        has_weather = input.weather.is_some(),
        "Chat request"
    );

    match state.orchestrator.respond(&identity, input).await {
        Ok(reply) => {
            let a = reply.admission;
            let headers = rate_headers(a.limit, a.remaining, a.reset_epoch_millis());
            Ok((headers, Json(ChatResponse { reply: reply.reply })).into_response())
        }
        Err(e) => {
            if let Error::RateLimited { retry_after_secs, .. } = &e {
                let client: String = identity.as_str().chars().take(20).collect();
                warn!(client = %client, retry_after_secs, "Rate limit exceeded");
            }
            Err(e.into())
        }
    }
}

// ── Weather ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    location: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    lang: Option<String>,
}

fn parse_language(raw: Option<&str>) -> Result<Language, Error> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(code) => code.parse().map_err(Error::Validation),
        None => Ok(Language::default()),
    }
}

impl WeatherParams {
    fn resolve(&self) -> Result<(LocationQuery, Language), Error> {
        let query = LocationQuery::from_params(
            self.location.as_deref(),
            self.lat.as_deref(),
            self.lon.as_deref(),
        )?;
        Ok((query, parse_language(self.lang.as_deref())?))
    }
}

fn weather_service(state: &SharedState) -> Result<&dyn outly_weather::WeatherService, Error> {
    state
        .weather
        .as_deref()
        .ok_or_else(|| Error::Config("Weather API key not configured".into()))
}

async fn weather_handler(
    State(state): State<SharedState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let service = weather_service(&state)?;
    let (query, lang) = params.resolve()?;

    let data = service
        .current(&query, lang)
        .await
        .map_err(|e| Error::upstream("Failed to fetch weather", &e))?;
    Ok(Json(data))
}

async fn forecast_handler(
    State(state): State<SharedState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let service = weather_service(&state)?;
    let (query, lang) = params.resolve()?;

    let data = service
        .forecast(&query, lang)
        .await
        .map_err(|e| Error::upstream("Failed to fetch forecast", &e))?;
    Ok(Json(data))
}

#[derive(Debug, Serialize)]
pub struct DailyForecastResponse<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<&'a str>,
    pub days: Vec<&'a ForecastEntry>,
}

async fn daily_forecast_handler(
    State(state): State<SharedState>,
    Query(params): Query<WeatherParams>,
) -> Result<Response, ApiError> {
    let service = weather_service(&state)?;
    let (query, lang) = params.resolve()?;

    let raw = service
        .forecast(&query, lang)
        .await
        .map_err(|e| Error::upstream("Failed to fetch forecast", &e))?;
    let data: ForecastData =
        serde_json::from_value(raw).map_err(|e| Error::upstream("Failed to fetch forecast", &e))?;

    let body = DailyForecastResponse {
        city: data.city.as_ref().map(|c| c.name.as_str()),
        days: daily_forecast(&data.list),
    };
    Ok(Json(body).into_response())
}

// ── Activities ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ActivityParams {
    condition: Option<String>,
    temp: Option<String>,
    wind: Option<String>,
    lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivitiesResponse {
    pub category: WeatherCategory,
    pub activities: &'static [ActivitySuggestion],
}

fn parse_number(name: &str, raw: &str) -> Result<f64, Error> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Validation(format!("Invalid {name} '{raw}'")))
}

async fn activities_handler(Query(params): Query<ActivityParams>) -> Result<Json<ActivitiesResponse>, ApiError> {
    let temp = match params.temp.as_deref() {
        Some(raw) => parse_number("temp", raw)?,
        None => return Err(Error::Validation("Missing temp parameter".into()).into()),
    };
    let wind = match params.wind.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_number("wind", raw)?,
        None => 0.0,
    };
    let lang = parse_language(params.lang.as_deref())?;
    let condition = params.condition.as_deref().unwrap_or_default();

    let (category, activities) = outly_activities::suggest(condition, temp, wind, lang);
    Ok(Json(ActivitiesResponse {
        category,
        activities: activities.as_slice(),
    }))
}
