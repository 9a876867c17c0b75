//! Current conditions from OpenWeatherMap.

mod client;
mod handlers;

pub use client::OpenWeatherClient;
pub use handlers::router;

use async_graphql::SimpleObject;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conditions reported for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    pub city: String,
    pub temperature: f64, // °C
    pub description: String,
    pub humidity: i32, // percent
    pub wind_speed: f64, // m/s
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather provider answered {0}")]
    Status(reqwest::StatusCode),
    #[error("weather response malformed: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> Result<Weather, WeatherError>;
}
