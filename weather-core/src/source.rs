//! Weather retrieval with graceful degradation.

use std::sync::Arc;

use crate::{
    Config, WeatherReading,
    provider::{ProviderId, WeatherProvider, provider_from_config, simulated::fallback_reading},
};

/// Fetches current conditions for a city and never fails outward: provider
/// errors are logged and replaced by a simulated reading.
#[derive(Debug, Clone)]
pub struct WeatherDataSource {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherDataSource {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::from(provider_from_config(config)?)))
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    pub async fn fetch(&self, city: &str) -> WeatherReading {
        match self.provider.current(city).await {
            Ok(reading) => reading,
            Err(err) => {
                tracing::warn!(
                    city,
                    provider = %self.provider.id(),
                    error = %format!("{err:#}"),
                    "weather lookup failed, falling back to simulated data"
                );
                fallback_reading(city, &mut rand::thread_rng())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::simulated::DESCRIPTIONS;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_with_key(base_url: String) -> Config {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("KEY".into());
        cfg.weather.base_url = base_url;
        cfg
    }

    #[tokio::test]
    async fn unconfigured_source_simulates_within_ranges() {
        let source = WeatherDataSource::from_config(&Config::default()).unwrap();
        assert_eq!(source.provider_id(), ProviderId::Simulated);

        for city in ["Beijing", "北京", "New York"] {
            let reading = source.fetch(city).await;
            assert!((15.0..=35.0).contains(&reading.temperature));
            assert!((40..=80).contains(&reading.humidity));
            assert!((0.0..=10.0).contains(&reading.wind_speed));
            assert!((1000..=1050).contains(&reading.pressure));
            assert!(DESCRIPTIONS.contains(&reading.description.as_str()));
        }
    }

    #[tokio::test]
    async fn provider_server_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let source = WeatherDataSource::from_config(&config_with_key(server.uri())).unwrap();
        assert_eq!(source.provider_id(), ProviderId::OpenWeather);

        let reading = source.fetch("Shanghai").await;

        assert!(reading.description.contains("Shanghai"));
        assert!(reading.description.contains("simulated"));
        assert_eq!(reading.pressure, 1013);
        assert_eq!(reading.visibility, 10.0);
        assert!((15.0..=35.0).contains(&reading.temperature));
    }

    #[tokio::test]
    async fn unparsable_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let source = WeatherDataSource::from_config(&config_with_key(server.uri())).unwrap();
        let reading = source.fetch("Shenzhen").await;

        assert_eq!(reading.pressure, 1013);
    }

    #[tokio::test]
    async fn unreachable_provider_falls_back() {
        // Nothing listens on port 9 locally.
        let source =
            WeatherDataSource::from_config(&config_with_key("http://127.0.0.1:9".into())).unwrap();
        let reading = source.fetch("Tokyo").await;

        assert!(reading.description.contains("Tokyo"));
    }
}
