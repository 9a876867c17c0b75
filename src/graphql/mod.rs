//! Read-only GraphQL view over every entity plus the weather lookup.

mod query;
mod types;

use std::sync::Arc;

use async_graphql::{http::GraphiQLSource, Context, EmptyMutation, EmptySubscription, Schema};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};

pub use query::QueryRoot;

use crate::{
    error::{AppError, AppResult},
    resource::handlers::json_body,
    state::{AppState, Services},
    weather::WeatherProvider,
};

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(services: Services, weather: Arc<dyn WeatherProvider>) -> AppSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(services)
        .data(weather)
        .finish()
}

pub(crate) fn services<'a>(ctx: &Context<'a>) -> &'a Services {
    ctx.data_unchecked::<Services>()
}

/// Resolver errors carry the same public message as REST responses.
pub(crate) fn to_gql(err: AppError) -> async_graphql::Error {
    tracing::warn!(error = %err, "resolver failed");
    async_graphql::Error::new(err.public_message())
}

/// `POST /graphql`.
pub fn router() -> Router<AppState> {
    Router::new().route("/graphql", post(graphql_handler))
}

/// `GET /graphiql`, left outside any auth layer.
pub fn explorer() -> Router<AppState> {
    Router::new().route("/graphiql", get(graphiql))
}

async fn graphql_handler(
    State(state): State<AppState>,
    payload: Result<Json<async_graphql::Request>, JsonRejection>,
) -> AppResult<Json<async_graphql::Response>> {
    let req = json_body(payload)?;
    Ok(Json(state.schema.execute(req).await))
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

#[cfg(test)]
mod tests {
    use async_graphql::value;

    use crate::{
        state::AppState,
        trainers::CreateTrainer,
        users::CreateUser,
        workouts::CreateWorkout,
    };

    #[tokio::test]
    async fn nested_fields_follow_foreign_keys() {
        let state = AppState::fake();
        let user = state
            .services
            .users
            .create(CreateUser {
                name: "Kim".into(),
                email: "kim@x.com".into(),
                password: "p".into(),
            })
            .await
            .unwrap();
        let trainer = state
            .services
            .trainers
            .create(CreateTrainer {
                name: "Lee".into(),
                specialization: "Running".into(),
            })
            .await
            .unwrap();
        state
            .services
            .workouts
            .create(CreateWorkout {
                kind: "Cardio".into(),
                duration: 30,
                date: None,
                user_id: Some(user.id),
            })
            .await
            .unwrap();
        state.services.relations.link(user.id, trainer.id).await.unwrap();

        let query = format!(
            r#"{{ user(id: "{}") {{ name workouts {{ type duration user {{ email }} }} goal {{ id }} trainers {{ name users {{ name }} }} }} }}"#,
            user.id
        );
        let resp = state.schema.execute(query.as_str()).await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        assert_eq!(
            resp.data,
            value!({
                "user": {
                    "name": "Kim",
                    "workouts": [{ "type": "Cardio", "duration": 30, "user": { "email": "kim@x.com" } }],
                    "goal": null,
                    "trainers": [{ "name": "Lee", "users": [{ "name": "Kim" }] }],
                }
            })
        );
    }

    #[tokio::test]
    async fn absent_ids_resolve_to_null() {
        let state = AppState::fake();
        let resp = state
            .schema
            .execute(r#"{ meal(id: "00000000-0000-0000-0000-000000000000") { id } trainer(id: "nope") { id } }"#)
            .await;
        assert!(resp.errors.is_empty());
        assert_eq!(resp.data, value!({ "meal": null, "trainer": null }));
    }

    #[tokio::test]
    async fn weather_failure_is_masked() {
        let state = AppState::fake();
        let resp = state
            .schema
            .execute(r#"{ weather(city: "Atlantis") { city } }"#)
            .await;
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(resp.errors[0].message, "Weather data unavailable");

        let ok = state
            .schema
            .execute(r#"{ weather(city: "Paris") { city temperature humidity windSpeed } }"#)
            .await;
        assert!(ok.errors.is_empty(), "{:?}", ok.errors);
        assert_eq!(
            ok.data,
            value!({ "weather": { "city": "Paris", "temperature": 21.0, "humidity": 40, "windSpeed": 2.5 } })
        );
    }
}
