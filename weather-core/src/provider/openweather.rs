use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;

use crate::{error::truncate_body, model::WeatherReading};

use super::{ProviderId, WeatherProvider};

const USER_AGENT: &str = concat!("weather-agent/", env!("CARGO_PKG_VERSION"));
/// Five-minute cache hint for intermediaries.
const CACHE_HINT: &str = "max-age=300";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    lang: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, lang: String) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build OpenWeather HTTP client")?;

        Ok(Self {
            api_key,
            base_url,
            lang,
            http,
        })
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherReading> {
        let url = format!("{}/data/2.5/weather", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .header(header::CACHE_CONTROL, CACHE_HINT)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        Ok(parsed.into_reading())
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    /// Metres.
    visibility: Option<f64>,
}

impl OwCurrentResponse {
    fn into_reading(self) -> WeatherReading {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let wind_speed = self.wind.map(|w| w.speed).unwrap_or(0.0);

        WeatherReading {
            temperature: self.main.temp.round(),
            feels_like: self.main.feels_like.round(),
            humidity: self.main.humidity,
            description,
            wind_speed: (wind_speed * 10.0).round() / 10.0,
            pressure: self.main.pressure,
            visibility: self
                .visibility
                .filter(|v| *v > 0.0)
                .map(|v| (v / 1000.0).round())
                .unwrap_or(10.0),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn current(&self, city: &str) -> Result<WeatherReading> {
        self.fetch_current(city).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::new("KEY".into(), server.uri(), "zh_cn".into()).unwrap()
    }

    #[tokio::test]
    async fn extracts_and_rounds_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Beijing"))
            .and(query_param("appid", "KEY"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "zh_cn"))
            .and(header("cache-control", "max-age=300"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 21.6, "feels_like": 20.4, "humidity": 45, "pressure": 1012 },
                "weather": [{ "description": "clear sky" }, { "description": "haze" }],
                "wind": { "speed": 3.26 },
                "visibility": 8400
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reading = provider(&server).current("Beijing").await.expect("reading");

        assert_eq!(reading.temperature, 22.0);
        assert_eq!(reading.feels_like, 20.0);
        assert_eq!(reading.humidity, 45);
        assert_eq!(reading.description, "clear sky");
        assert_eq!(reading.wind_speed, 3.3);
        assert_eq!(reading.pressure, 1012);
        assert_eq!(reading.visibility, 8.0);
    }

    #[tokio::test]
    async fn missing_optional_fields_use_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 10.0, "feels_like": 9.0, "humidity": 90, "pressure": 1001 },
                "weather": []
            })))
            .mount(&server)
            .await;

        let reading = provider(&server).current("Oslo").await.expect("reading");

        assert_eq!(reading.description, "unknown");
        assert_eq!(reading.wind_speed, 0.0);
        assert_eq!(reading.visibility, 10.0);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let err = provider(&server).current("Paris").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("401"), "{msg}");
        assert!(msg.contains("invalid key"), "{msg}");
    }
}
