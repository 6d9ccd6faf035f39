use crate::{
    Config, WeatherReading,
    provider::{openweather::OpenWeatherProvider, simulated::SimulatedProvider},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;
pub mod simulated;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Simulated,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Simulated => "simulated",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn current(&self, city: &str) -> anyhow::Result<WeatherReading>;
}

/// Pick the provider the configuration allows: OpenWeather with a real key,
/// simulation otherwise.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let boxed: Box<dyn WeatherProvider> = match config.weather_api_key() {
        Some(api_key) => Box::new(OpenWeatherProvider::new(
            api_key.to_owned(),
            config.weather.base_url.clone(),
            config.weather.lang.clone(),
        )?),
        None => Box::new(SimulatedProvider),
    };

    Ok(boxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_display() {
        assert_eq!(ProviderId::OpenWeather.to_string(), "openweather");
        assert_eq!(ProviderId::Simulated.to_string(), "simulated");
    }

    #[test]
    fn missing_key_selects_simulation() {
        let cfg = Config::default();
        let provider = provider_from_config(&cfg).expect("provider");
        assert_eq!(provider.id(), ProviderId::Simulated);
    }

    #[test]
    fn demo_key_selects_simulation() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("demo_key".into());
        let provider = provider_from_config(&cfg).expect("provider");
        assert_eq!(provider.id(), ProviderId::Simulated);
    }

    #[test]
    fn real_key_selects_openweather() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("KEY".into());
        let provider = provider_from_config(&cfg).expect("provider");
        assert_eq!(provider.id(), ProviderId::OpenWeather);
    }
}
