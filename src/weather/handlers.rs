use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, instrument};

use super::Weather;
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/weather", get(current_weather))
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

#[instrument(skip(state))]
async fn current_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<Weather>> {
    let city = query
        .city
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation("city is required".into()))?;

    state.weather.current(&city).await.map(Json).map_err(|e| {
        error!(error = %e, city = %city, "weather lookup failed");
        AppError::Upstream(e.to_string())
    })
}
