//! Query orchestration shared by the HTTP routes and the `ask` command.

use std::time::Duration;

use weather_core::{AgentError, AgentReply, Language, WeatherQuery};

use crate::{
    envelope::WeatherData,
    error::{ApiError, Result},
    state::AppState,
};

pub fn full_query_prompt(city: &str, language: Language) -> String {
    match language {
        Language::Zh => format!("请查询{city}的当前天气情况，并提供简洁的生活建议。"),
        Language::En => {
            format!("Please check the current weather in {city} and give brief lifestyle advice.")
        }
    }
}

pub fn quick_query_prompt(city: &str) -> String {
    format!("请简要查询{city}的当前天气")
}

/// Structured query: credential check, validation, 25 s bound by default.
pub async fn full_query(state: &AppState, query: WeatherQuery) -> Result<WeatherData> {
    let agent = state.agent()?;
    let city = query.city().ok_or_else(ApiError::missing_city)?.to_string();
    let language = query.language.unwrap_or_default();

    tracing::info!(%city, ?language, "weather query");
    let prompt = full_query_prompt(&city, language);
    let reply = race(
        agent.generate(&prompt),
        state.config().full_query_timeout(),
        state.config().is_production(),
    )
    .await?;

    let reading = reply.reading;
    Ok(WeatherData {
        city,
        temperature: reading.as_ref().map(|r| r.temperature),
        description: reading.as_ref().map(|r| r.description.clone()),
        humidity: reading.as_ref().map(|r| r.humidity),
        wind_speed: reading.as_ref().map(|r| r.wind_speed),
        advice: reply.text,
    })
}

/// Terse query for a bare city name, 20 s bound by default.
pub async fn quick_query(state: &AppState, city: &str) -> Result<String> {
    let agent = state.agent()?;
    let city = city.trim();
    if city.is_empty() {
        return Err(ApiError::missing_city());
    }

    tracing::info!(city, "quick weather query");
    let reply = race(
        agent.generate(&quick_query_prompt(city)),
        state.config().quick_query_timeout(),
        state.config().is_production(),
    )
    .await?;

    Ok(reply.text)
}

/// Bound the agent call. On expiry the generation future is dropped, which
/// aborts any in-flight model or weather request.
async fn race<F>(generation: F, bound: Duration, production: bool) -> Result<AgentReply>
where
    F: Future<Output = std::result::Result<AgentReply, AgentError>>,
{
    match tokio::time::timeout(bound, generation).await {
        Ok(Ok(reply)) => Ok(reply),
        Ok(Err(err)) => {
            tracing::error!(error = %err, "agent generation failed");
            Err(ApiError::from_agent(err, !production))
        }
        Err(_) => {
            tracing::warn!(bound_secs = bound.as_secs(), "agent generation timed out");
            Err(ApiError::Timeout)
        }
    }
}
