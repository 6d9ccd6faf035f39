//! JSON bodies returned by the API.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2024-12-03T10:30:00.000Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub const AVAILABLE_ENDPOINTS: [&str; 4] = [
    "GET /",
    "GET /health",
    "POST /api/weather",
    "GET /api/weather/:city",
];

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub environment: String,
}

/// Structured answer for the full query. Numeric fields come from the tool
/// reading and are `null` when the model answered without calling the tool.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    pub city: String,
    pub temperature: Option<f64>,
    pub description: Option<String>,
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    pub advice: String,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub success: bool,
    pub data: WeatherData,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct QuickWeatherResponse {
    pub success: bool,
    pub city: String,
    pub response: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub message: &'static str,
    pub available_endpoints: [&'static str; 4],
    pub timestamp: String,
}

impl Default for NotFoundResponse {
    fn default() -> Self {
        Self {
            error: "Not Found",
            message: "The requested endpoint does not exist",
            available_endpoints: AVAILABLE_ENDPOINTS,
            timestamp: timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_utc_millis() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'), "{ts}");
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        // 2024-12-03T10:30:00.000Z
        assert_eq!(ts.len(), 24);
    }

    #[test]
    fn weather_data_uses_camel_case_and_nulls() {
        let data = WeatherData {
            city: "北京".into(),
            temperature: None,
            description: None,
            humidity: None,
            wind_speed: None,
            advice: "Take an umbrella.".into(),
        };
        let value = serde_json::to_value(&data).unwrap();

        assert!(value["windSpeed"].is_null());
        assert!(value["temperature"].is_null());
        assert_eq!(value["advice"], "Take an umbrella.");
    }
}
