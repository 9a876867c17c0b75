use async_graphql::{Context, Object, Result, ID};
use uuid::Uuid;

use super::{services, to_gql};
use crate::{
    dates::{format_date, format_timestamp},
    goals::Goal,
    meals::Meal,
    trainers::Trainer,
    users::User,
    workouts::Workout,
};

/// Resolves an optional owning-user reference.
async fn owner(ctx: &Context<'_>, user_id: Option<Uuid>) -> Result<Option<UserObject>> {
    let Some(id) = user_id else {
        return Ok(None);
    };
    let user = services(ctx).users.find(id).await.map_err(to_gql)?;
    Ok(user.map(UserObject))
}

pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn workouts(&self, ctx: &Context<'_>) -> Result<Vec<WorkoutObject>> {
        let rows = services(ctx)
            .relations
            .workouts_of(self.0.id)
            .await
            .map_err(to_gql)?;
        Ok(rows.into_iter().map(WorkoutObject).collect())
    }

    async fn meals(&self, ctx: &Context<'_>) -> Result<Vec<MealObject>> {
        let rows = services(ctx)
            .relations
            .meals_of(self.0.id)
            .await
            .map_err(to_gql)?;
        Ok(rows.into_iter().map(MealObject).collect())
    }

    async fn goal(&self, ctx: &Context<'_>) -> Result<Option<GoalObject>> {
        let goal = services(ctx)
            .relations
            .goal_of(self.0.id)
            .await
            .map_err(to_gql)?;
        Ok(goal.map(GoalObject))
    }

    async fn trainers(&self, ctx: &Context<'_>) -> Result<Vec<TrainerObject>> {
        let rows = services(ctx)
            .relations
            .trainers_of(self.0.id)
            .await
            .map_err(to_gql)?;
        Ok(rows.into_iter().map(TrainerObject).collect())
    }
}

pub struct WorkoutObject(pub Workout);

#[Object(name = "Workout")]
impl WorkoutObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    #[graphql(name = "type")]
    async fn kind(&self) -> &str {
        &self.0.kind
    }

    async fn duration(&self) -> i32 {
        self.0.duration
    }

    async fn date(&self) -> Option<String> {
        self.0.date.map(format_date)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        owner(ctx, self.0.user_id).await
    }
}

pub struct MealObject(pub Meal);

#[Object(name = "Meal")]
impl MealObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn calories(&self) -> i32 {
        self.0.calories
    }

    async fn time(&self) -> String {
        format_timestamp(self.0.time)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        owner(ctx, self.0.user_id).await
    }
}

pub struct GoalObject(pub Goal);

#[Object(name = "Goal")]
impl GoalObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn target_weight(&self) -> f64 {
        self.0.target_weight
    }

    async fn target_date(&self) -> String {
        format_date(self.0.target_date)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        owner(ctx, self.0.user_id).await
    }
}

pub struct TrainerObject(pub Trainer);

#[Object(name = "Trainer")]
impl TrainerObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn specialization(&self) -> &str {
        &self.0.specialization
    }

    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserObject>> {
        let rows = services(ctx)
            .relations
            .clients_of(self.0.id)
            .await
            .map_err(to_gql)?;
        Ok(rows.into_iter().map(UserObject).collect())
    }
}
