use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::dto::{LoginRequest, LoginResponse, MessageResponse, SignupRequest},
    error::ErrorBody,
    resource::Entity,
    weather::Weather,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx answer; `message` is the server's `error` field when present.
    #[error("{message} ({status})")]
    Status { status: u16, message: String },
    #[error("{0}")]
    GraphQl(String),
}

/// CRUD calls a page needs for one entity type.
#[async_trait]
pub trait ResourceApi<E: Entity>: Send + Sync {
    async fn list(&self) -> Result<Vec<E>, ApiError>;
    async fn create(&self, input: &E::Create) -> Result<E, ApiError>;
    async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<E, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Typed HTTP client for the FitFusion API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attaches `Authorization: Bearer` to every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let resp = builder.send().await?;
        let status = resp.status();
        debug!(%status, url = %resp.url(), "api response");
        if status.is_success() {
            return Ok(resp);
        }
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        Ok(self.send(builder).await?.json().await?)
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<MessageResponse, ApiError> {
        self.json(self.request(Method::POST, "/auth/signup").json(req))
            .await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.json(self.request(Method::POST, "/auth/login").json(req))
            .await
    }

    /// Runs the `weather` GraphQL query.
    pub async fn weather(&self, city: &str) -> Result<Weather, ApiError> {
        #[derive(Deserialize)]
        struct GqlError {
            message: String,
        }
        #[derive(Deserialize)]
        struct Data {
            weather: Option<Weather>,
        }
        #[derive(Deserialize)]
        struct Envelope {
            data: Option<Data>,
            #[serde(default)]
            errors: Vec<GqlError>,
        }

        let body = json!({
            "query": "query($city: String!) { weather(city: $city) { city temperature description humidity windSpeed } }",
            "variables": { "city": city },
        });
        let envelope: Envelope = self
            .json(self.request(Method::POST, "/graphql").json(&body))
            .await?;
        if let Some(err) = envelope.errors.into_iter().next() {
            return Err(ApiError::GraphQl(err.message));
        }
        envelope
            .data
            .and_then(|d| d.weather)
            .ok_or_else(|| ApiError::GraphQl("empty weather response".into()))
    }
}

#[async_trait]
impl<E: Entity> ResourceApi<E> for ApiClient {
    async fn list(&self) -> Result<Vec<E>, ApiError> {
        self.json(self.request(Method::GET, E::PATH)).await
    }

    async fn create(&self, input: &E::Create) -> Result<E, ApiError> {
        self.json(self.request(Method::POST, E::PATH).json(input))
            .await
    }

    async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<E, ApiError> {
        let path = format!("{}/{}", E::PATH, id);
        self.json(self.request(Method::PUT, &path).json(patch))
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let path = format!("{}/{}", E::PATH, id);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainers::{CreateTrainer, Trainer};
    use mockito::Matcher;

    #[tokio::test]
    async fn list_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let endpoint = server
            .mock("GET", "/trainers")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":"6f1c1c4e-8a9e-4a53-9a7e-1d2b3c4d5e6f","name":"Kai","specialization":"Yoga",
                    "createdAt":"2024-04-10T08:00:00Z","updatedAt":"2024-04-10T08:00:00Z"}]"#,
            )
            .expect(1)
            .create();

        let client = ApiClient::new(&server.url()).with_token(Some("tok".into()));
        let trainers: Vec<Trainer> = ResourceApi::<Trainer>::list(&client).await.unwrap();
        assert_eq!(trainers.len(), 1);
        assert_eq!(trainers[0].name, "Kai");
        endpoint.assert();
    }

    #[tokio::test]
    async fn error_body_becomes_status_error() {
        let mut server = mockito::Server::new_async().await;
        let endpoint = server
            .mock("POST", "/trainers")
            .match_body(Matcher::PartialJsonString(r#"{"name":"Kai"}"#.into()))
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"missing field `specialization`"}"#)
            .create();

        let client = ApiClient::new(&server.url());
        let err = ResourceApi::<Trainer>::create(
            &client,
            &CreateTrainer {
                name: "Kai".into(),
                specialization: String::new(),
            },
        )
        .await
        .unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "missing field `specialization`");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        endpoint.assert();
    }

    #[tokio::test]
    async fn weather_surfaces_graphql_errors() {
        let mut server = mockito::Server::new_async().await;
        let endpoint = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":null,"errors":[{"message":"Weather data unavailable"}]}"#)
            .create();

        let err = ApiClient::new(&server.url()).weather("Nowhere").await.unwrap_err();
        assert!(matches!(err, ApiError::GraphQl(ref m) if m == "Weather data unavailable"));
        endpoint.assert();
    }
}
