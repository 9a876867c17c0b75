use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{LoginRequest, LoginResponse, MessageResponse, PublicUser, SignupRequest},
    jwt::{AuthUser, JwtKeys},
    services,
};
use crate::{
    error::{AppError, AppResult, AuthFailure},
    resource::handlers::json_body,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
}

#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let req = json_body(payload)?;
    services::signup(&state.services, req, state.config.strict_email).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".into(),
        }),
    ))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let req = json_body(payload)?;
    let keys = JwtKeys::from_ref(&state);
    Ok(Json(services::login(&state.services, &keys, req).await?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<PublicUser>> {
    // A token can outlive its account.
    let user = state
        .services
        .users
        .find(caller.id)
        .await?
        .ok_or(AppError::Unauthorized(AuthFailure::InvalidToken))?;
    Ok(Json(user.into()))
}
