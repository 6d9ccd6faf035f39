use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Current conditions for a city, as handed to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// Current temperature (°C)
    pub temperature: f64,
    /// Feels-like temperature (°C)
    pub feels_like: f64,
    /// Relative humidity (%)
    pub humidity: u8,
    /// Short weather description
    pub description: String,
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Atmospheric pressure (hPa)
    pub pressure: u32,
    /// Visibility (km)
    pub visibility: f64,
}

/// Reply language requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

/// Structured weather query accepted by `POST /api/weather`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
}

impl WeatherQuery {
    /// The trimmed city name, if one was supplied.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Output of a single agent generation.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    /// Free-form model prose. Never parsed.
    pub text: String,
    /// Last reading produced by the weather tool during this generation.
    pub reading: Option<WeatherReading>,
}
