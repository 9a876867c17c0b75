use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use super::{Weather, WeatherError, WeatherProvider};
use crate::config::WeatherConfig;

/// Single `GET /data/2.5/weather` per lookup. No retry, no cache.
#[derive(Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    main: MainBlock,
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

impl OpenWeatherClient {
    pub fn new(cfg: &WeatherConfig) -> Self {
        Self::with_client(reqwest::Client::new(), cfg)
    }

    pub fn with_client(http: reqwest::Client, cfg: &WeatherConfig) -> Self {
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<Weather, WeatherError> {
        info!("calling OpenWeatherMap");
        let resp = self
            .http
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status));
        }

        let body: CurrentResponse = resp
            .json()
            .await
            .map_err(|e| WeatherError::Malformed(e.to_string()))?;
        let description = body
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| WeatherError::Malformed("no weather conditions".into()))?;

        Ok(Weather {
            city: body.name,
            temperature: body.main.temp,
            description,
            humidity: body.main.humidity,
            wind_speed: body.wind.speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Mock, ServerGuard};

    fn client_for(server: &ServerGuard) -> OpenWeatherClient {
        OpenWeatherClient::new(&WeatherConfig {
            api_key: "k".into(),
            base_url: server.url(),
        })
    }

    fn mock_weather_endpoint(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
        server
            .mock("GET", "/data/2.5/weather")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Paris".into()),
                Matcher::UrlEncoded("appid".into(), "k".into()),
                Matcher::UrlEncoded("units".into(), "metric".into()),
            ]))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(1)
            .create()
    }

    #[tokio::test]
    async fn maps_provider_payload() {
        let mut server = mockito::Server::new_async().await;
        let endpoint = mock_weather_endpoint(
            &mut server,
            200,
            r#"{"name":"Paris","main":{"temp":18.5,"humidity":60},
                "weather":[{"description":"light rain"}],"wind":{"speed":3.2}}"#,
        );

        let weather = client_for(&server).current("Paris").await.unwrap();
        assert_eq!(
            weather,
            Weather {
                city: "Paris".into(),
                temperature: 18.5,
                description: "light rain".into(),
                humidity: 60,
                wind_speed: 3.2,
            }
        );
        endpoint.assert();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let endpoint = mock_weather_endpoint(&mut server, 404, r#"{"cod":"404","message":"city not found"}"#);

        let err = client_for(&server).current("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::Status(s) if s.as_u16() == 404));
        endpoint.assert();
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let endpoint = mock_weather_endpoint(&mut server, 200, r#"{"name":"Paris","weather":[]}"#);

        let err = client_for(&server).current("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
        endpoint.assert();
    }
}
