use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf, str::FromStr, time::Duration};

/// Placeholder keys that mean "no real weather key configured".
const WEATHER_KEY_SENTINELS: &[&str] = &["demo", "demo_key"];

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

/// Deployment environment; controls error verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(anyhow!(
                "Unknown environment '{value}'. Supported: development, staging, production."
            )),
        }
    }
}

/// Chat model credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Upper bound on model round-trips per generation.
    pub max_steps: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            max_steps: 5,
        }
    }
}

/// Weather provider credentials (OpenWeatherMap).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Locale hint forwarded as `lang`.
    pub lang: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            lang: "zh_cn".to_string(),
        }
    }
}

/// Top-level service configuration.
///
/// Example TOML:
/// ```toml
/// environment = "production"
/// port = 8080
///
/// [model]
/// api_key = "sk-..."
///
/// [weather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub full_query_timeout_secs: u64,
    pub quick_query_timeout_secs: u64,
    pub model: ModelConfig,
    pub weather: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Weather Agent Service".to_string(),
            app_version: "1.0.0".to_string(),
            environment: Environment::default(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            full_query_timeout_secs: 25,
            quick_query_timeout_secs: 20,
            model: ModelConfig::default(),
            weather: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk (if present) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-agent", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("OPENAI_API_KEY") {
            self.model.api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.model.base_url = v;
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.model.model = v;
        }
        if let Some(v) = get("WEATHER_API_KEY") {
            self.weather.api_key = Some(v);
        }
        if let Some(v) = get("WEATHER_API_BASE_URL") {
            self.weather.base_url = v;
        }
        if let Some(v) = get("ENVIRONMENT") {
            self.environment = v.parse()?;
        }
        if let Some(v) = get("APP_NAME") {
            self.app_name = v;
        }
        if let Some(v) = get("APP_VERSION") {
            self.app_version = v;
        }
        if let Some(v) = get("PORT") {
            self.port = v
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value '{v}'"))?;
        }

        Ok(())
    }

    /// Returns the chat model API key, if present.
    pub fn model_api_key(&self) -> Option<&str> {
        self.model.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Returns the weather API key unless it is missing or a demo placeholder.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !WEATHER_KEY_SENTINELS.contains(k))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn full_query_timeout(&self) -> Duration {
        Duration::from_secs(self.full_query_timeout_secs)
    }

    pub fn quick_query_timeout(&self) -> Duration {
        Duration::from_secs(self.quick_query_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_service_expectations() {
        let cfg = Config::default();

        assert_eq!(cfg.app_version, "1.0.0");
        assert_eq!(cfg.environment, Environment::Development);
        assert_eq!(cfg.full_query_timeout(), Duration::from_secs(25));
        assert_eq!(cfg.quick_query_timeout(), Duration::from_secs(20));
        assert!(cfg.model_api_key().is_none());
        assert!(cfg.weather_api_key().is_none());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg = Config::default();
        cfg.apply_overrides(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("WEATHER_API_KEY", "real-key"),
            ("ENVIRONMENT", "production"),
            ("APP_VERSION", "2.3.4"),
            ("PORT", "8080"),
        ]))
        .expect("overrides should apply");

        assert_eq!(cfg.model_api_key(), Some("sk-test"));
        assert_eq!(cfg.weather_api_key(), Some("real-key"));
        assert!(cfg.is_production());
        assert_eq!(cfg.app_version, "2.3.4");
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.apply_overrides(lookup(&[("OPENAI_API_KEY", ""), ("APP_NAME", "  ")]))
            .unwrap();

        assert!(cfg.model_api_key().is_none());
        assert_eq!(cfg.app_name, "Weather Agent Service");
    }

    #[test]
    fn demo_weather_keys_count_as_unconfigured() {
        for sentinel in ["demo", "demo_key", " "] {
            let mut cfg = Config::default();
            cfg.weather.api_key = Some(sentinel.to_string());
            assert!(cfg.weather_api_key().is_none(), "{sentinel:?} should be ignored");
        }
    }

    #[test]
    fn invalid_environment_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_overrides(lookup(&[("ENVIRONMENT", "moon")]))
            .unwrap_err();

        assert!(err.to_string().contains("Unknown environment"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.apply_overrides(lookup(&[("PORT", "eighty")])).unwrap_err();

        assert!(err.to_string().contains("Invalid PORT"));
    }

    #[test]
    fn parses_toml_sections() {
        let cfg: Config = toml::from_str(
            r#"
            environment = "staging"

            [model]
            api_key = "sk-file"

            [weather]
            lang = "en"
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.environment, Environment::Staging);
        assert_eq!(cfg.model_api_key(), Some("sk-file"));
        assert_eq!(cfg.model.model, "gpt-4o-mini");
        assert_eq!(cfg.weather.lang, "en");
        assert_eq!(cfg.port, 3000);
    }
}
