use async_trait::async_trait;
use rand::{Rng, seq::SliceRandom};

use crate::model::WeatherReading;

use super::{ProviderId, WeatherProvider};

pub const DESCRIPTIONS: [&str; 10] = [
    "clear",
    "cloudy",
    "overcast",
    "light rain",
    "moderate rain",
    "thunderstorm",
    "fog",
    "mist",
    "clear to cloudy",
    "cloudy to overcast",
];

/// Produces plausible readings without touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProvider;

#[async_trait]
impl WeatherProvider for SimulatedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Simulated
    }

    async fn current(&self, city: &str) -> anyhow::Result<WeatherReading> {
        tracing::info!(city, "using simulated weather data");
        Ok(simulated_reading(&mut rand::thread_rng()))
    }
}

/// Every field drawn independently from its range, rounded to whole units.
pub fn simulated_reading<R: Rng + ?Sized>(rng: &mut R) -> WeatherReading {
    let description = DESCRIPTIONS
        .choose(rng)
        .copied()
        .unwrap_or(DESCRIPTIONS[0]);

    WeatherReading {
        temperature: rng.gen_range(15.0..=35.0_f64).round(),
        feels_like: rng.gen_range(15.0..=35.0_f64).round(),
        humidity: rng.gen_range(40..=80),
        description: description.to_string(),
        wind_speed: rng.gen_range(0.0..=10.0_f64).round(),
        pressure: rng.gen_range(1000..=1050),
        visibility: rng.gen_range(5.0..=20.0_f64).round(),
    }
}

/// Reading returned when the real provider fails.
pub fn fallback_reading<R: Rng + ?Sized>(city: &str, rng: &mut R) -> WeatherReading {
    WeatherReading {
        temperature: rng.gen_range(15.0..=35.0_f64).round(),
        feels_like: rng.gen_range(15.0..=35.0_f64).round(),
        humidity: rng.gen_range(40..=80),
        description: format!(
            "Weather data for {city} is temporarily unavailable; showing simulated data"
        ),
        wind_speed: rng.gen_range(0.0..=10.0_f64).round(),
        pressure: 1013,
        visibility: 10.0,
    }
}
