use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::Entity;
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

/// `POST /`, `GET /`, `GET /:id`, `PUT /:id`, `DELETE /:id` for `E`, meant
/// to be nested under `E::PATH`.
pub fn router<E: Entity>() -> Router<AppState> {
    Router::new()
        .route("/", post(create::<E>).get(list::<E>))
        .route("/:id", get(fetch::<E>).put(update::<E>).delete(remove::<E>))
}

/// Path ids that are not UUIDs cannot match a row.
pub(crate) fn parse_id<E: Entity>(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(E::NOT_FOUND.into()))
}

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

#[instrument(skip_all, fields(entity = E::NAME))]
async fn create<E: Entity>(
    State(state): State<AppState>,
    payload: Result<Json<E::Create>, JsonRejection>,
) -> AppResult<(StatusCode, Json<E>)> {
    let input = json_body(payload)?;
    let record = E::service(&state.services).create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip_all, fields(entity = E::NAME))]
async fn list<E: Entity>(State(state): State<AppState>) -> AppResult<Json<Vec<E>>> {
    Ok(Json(E::service(&state.services).list().await?))
}

#[instrument(skip(state), fields(entity = E::NAME))]
async fn fetch<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<E>> {
    let id = parse_id::<E>(&id)?;
    Ok(Json(E::service(&state.services).get(id).await?))
}

#[instrument(skip(state, payload), fields(entity = E::NAME))]
async fn update<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<E::Patch>, JsonRejection>,
) -> AppResult<Json<E>> {
    let id = parse_id::<E>(&id)?;
    let service = E::service(&state.services);
    // A missing record wins over a bad body.
    service.get(id).await?;
    let patch = json_body(payload)?;
    Ok(Json(service.update(id, patch).await?))
}

#[instrument(skip(state), fields(entity = E::NAME))]
async fn remove<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id::<E>(&id)?;
    E::service(&state.services).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
