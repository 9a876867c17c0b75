use std::sync::Arc;

use async_graphql::{Context, Object, Result, ID};
use tracing::{error, info};
use uuid::Uuid;

use super::{
    services, to_gql,
    types::{GoalObject, MealObject, TrainerObject, UserObject, WorkoutObject},
};
use crate::weather::{Weather, WeatherProvider};

/// Ids that are not UUIDs never match a row.
fn parse_id(id: &ID) -> Option<Uuid> {
    Uuid::parse_str(id.as_str()).ok()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserObject>> {
        let rows = services(ctx).users.list().await.map_err(to_gql)?;
        Ok(rows.into_iter().map(UserObject).collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<UserObject>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        let row = services(ctx).users.find(id).await.map_err(to_gql)?;
        Ok(row.map(UserObject))
    }

    async fn workouts(&self, ctx: &Context<'_>) -> Result<Vec<WorkoutObject>> {
        let rows = services(ctx).workouts.list().await.map_err(to_gql)?;
        Ok(rows.into_iter().map(WorkoutObject).collect())
    }

    async fn workout(&self, ctx: &Context<'_>, id: ID) -> Result<Option<WorkoutObject>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        let row = services(ctx).workouts.find(id).await.map_err(to_gql)?;
        Ok(row.map(WorkoutObject))
    }

    async fn meals(&self, ctx: &Context<'_>) -> Result<Vec<MealObject>> {
        let rows = services(ctx).meals.list().await.map_err(to_gql)?;
        Ok(rows.into_iter().map(MealObject).collect())
    }

    async fn meal(&self, ctx: &Context<'_>, id: ID) -> Result<Option<MealObject>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        let row = services(ctx).meals.find(id).await.map_err(to_gql)?;
        Ok(row.map(MealObject))
    }

    async fn goals(&self, ctx: &Context<'_>) -> Result<Vec<GoalObject>> {
        let rows = services(ctx).goals.list().await.map_err(to_gql)?;
        Ok(rows.into_iter().map(GoalObject).collect())
    }

    async fn goal(&self, ctx: &Context<'_>, id: ID) -> Result<Option<GoalObject>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        let row = services(ctx).goals.find(id).await.map_err(to_gql)?;
        Ok(row.map(GoalObject))
    }

    async fn trainers(&self, ctx: &Context<'_>) -> Result<Vec<TrainerObject>> {
        let rows = services(ctx).trainers.list().await.map_err(to_gql)?;
        Ok(rows.into_iter().map(TrainerObject).collect())
    }

    async fn trainer(&self, ctx: &Context<'_>, id: ID) -> Result<Option<TrainerObject>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        let row = services(ctx).trainers.find(id).await.map_err(to_gql)?;
        Ok(row.map(TrainerObject))
    }

    async fn weather(&self, ctx: &Context<'_>, city: String) -> Result<Weather> {
        let provider = ctx.data_unchecked::<Arc<dyn WeatherProvider>>();
        info!(city = %city, "fetching weather");
        provider.current(&city).await.map_err(|e| {
            error!(error = %e, city = %city, "weather lookup failed");
            async_graphql::Error::new("Weather data unavailable")
        })
    }
}
