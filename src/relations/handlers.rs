use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    goals::Goal,
    meals::Meal,
    resource::handlers::parse_id,
    state::AppState,
    trainers::Trainer,
    users::User,
    workouts::Workout,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/:id/workouts", get(user_workouts))
        .route("/users/:id/meals", get(user_meals))
        .route("/users/:id/goal", get(user_goal))
        .route("/users/:id/trainers", get(user_trainers))
        .route(
            "/users/:id/trainers/:trainer_id",
            put(link_trainer).delete(unlink_trainer),
        )
        .route("/trainers/:id/users", get(trainer_users))
}

/// 404 unless the user exists.
async fn existing_user(state: &AppState, raw: &str) -> AppResult<User> {
    let id = parse_id::<User>(raw)?;
    state.services.users.get(id).await
}

async fn existing_trainer(state: &AppState, raw: &str) -> AppResult<Trainer> {
    let id = parse_id::<Trainer>(raw)?;
    state.services.trainers.get(id).await
}

#[instrument(skip(state))]
async fn user_workouts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Workout>>> {
    let user = existing_user(&state, &id).await?;
    Ok(Json(state.services.relations.workouts_of(user.id).await?))
}

#[instrument(skip(state))]
async fn user_meals(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Meal>>> {
    let user = existing_user(&state, &id).await?;
    Ok(Json(state.services.relations.meals_of(user.id).await?))
}

#[instrument(skip(state))]
async fn user_goal(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Goal>> {
    let user = existing_user(&state, &id).await?;
    state
        .services
        .relations
        .goal_of(user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Not found".into()))
}

#[instrument(skip(state))]
async fn user_trainers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Trainer>>> {
    let user = existing_user(&state, &id).await?;
    Ok(Json(state.services.relations.trainers_of(user.id).await?))
}

#[instrument(skip(state))]
async fn trainer_users(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<User>>> {
    let trainer = existing_trainer(&state, &id).await?;
    Ok(Json(state.services.relations.clients_of(trainer.id).await?))
}

#[instrument(skip(state))]
async fn link_trainer(
    State(state): State<AppState>,
    Path((id, trainer_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let user = existing_user(&state, &id).await?;
    let trainer = existing_trainer(&state, &trainer_id).await?;
    state.services.relations.link(user.id, trainer.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn unlink_trainer(
    State(state): State<AppState>,
    Path((id, trainer_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let user = existing_user(&state, &id).await?;
    let trainer = existing_trainer(&state, &trainer_id).await?;
    state.services.relations.unlink(user.id, trainer.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
