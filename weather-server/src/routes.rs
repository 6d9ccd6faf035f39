use std::any::Any;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use weather_core::WeatherQuery;

use crate::{
    envelope::{HealthResponse, NotFoundResponse, QuickWeatherResponse, WeatherResponse, timestamp},
    error::ApiError,
    handler,
    state::AppState,
};

const INDEX_HTML: &str = include_str!("index.html");

/// Build the HTTP router with CORS, request tracing and panic recovery.
pub fn router(state: AppState) -> Router {
    let expose_errors = !state.config().is_production();

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/weather", post(weather))
        .route("/api/weather/{city}", get(quick_weather))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
            panic_response(panic, expose_errors)
        }))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.config();

    Json(HealthResponse {
        status: "healthy",
        service: config.app_name.clone(),
        version: config.app_version.clone(),
        timestamp: timestamp(),
        environment: config.environment.to_string(),
    })
}

async fn weather(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    // Credential is a precondition; check it before looking at the body.
    state.agent()?;

    let query: WeatherQuery = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Invalid JSON body: {e}")))?;

    let data = handler::full_query(&state, query).await?;

    Ok(Json(WeatherResponse {
        success: true,
        data,
        timestamp: timestamp(),
    })
    .into_response())
}

async fn quick_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Response, ApiError> {
    let response = handler::quick_query(&state, &city).await?;

    Ok(Json(QuickWeatherResponse {
        success: true,
        city: city.trim().to_string(),
        response,
        timestamp: timestamp(),
    })
    .into_response())
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(NotFoundResponse::default())).into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>, expose: bool) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(%message, "handler panicked");
    ApiError::internal(message, expose).into_response()
}
