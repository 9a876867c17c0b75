use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::{DbError, Relations},
    error::{AppError, AppResult},
    goals::Goal,
    meals::Meal,
    trainers::Trainer,
    users::User,
    workouts::Workout,
};

pub const NOT_LINKED: &str = "Trainer is not linked to this user";

/// Relationship lookups shared by the REST routes, GraphQL resolvers and
/// the login flow.
#[derive(Clone)]
pub struct RelationService {
    repo: Arc<dyn Relations>,
}

impl RelationService {
    pub fn new(repo: Arc<dyn Relations>) -> Self {
        Self { repo }
    }

    pub async fn user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_user_by_email(email).await.map_err(db_error)
    }

    pub async fn workouts_of(&self, user_id: Uuid) -> AppResult<Vec<Workout>> {
        self.repo.workouts_by_user(user_id).await.map_err(db_error)
    }

    pub async fn meals_of(&self, user_id: Uuid) -> AppResult<Vec<Meal>> {
        self.repo.meals_by_user(user_id).await.map_err(db_error)
    }

    pub async fn goal_of(&self, user_id: Uuid) -> AppResult<Option<Goal>> {
        self.repo.goal_by_user(user_id).await.map_err(db_error)
    }

    pub async fn trainers_of(&self, user_id: Uuid) -> AppResult<Vec<Trainer>> {
        self.repo.trainers_by_user(user_id).await.map_err(db_error)
    }

    pub async fn clients_of(&self, trainer_id: Uuid) -> AppResult<Vec<User>> {
        self.repo.users_by_trainer(trainer_id).await.map_err(db_error)
    }

    #[instrument(skip(self))]
    pub async fn link(&self, user_id: Uuid, trainer_id: Uuid) -> AppResult<()> {
        self.repo
            .link_trainer(user_id, trainer_id)
            .await
            .map_err(db_error)?;
        info!("trainer linked");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn unlink(&self, user_id: Uuid, trainer_id: Uuid) -> AppResult<()> {
        let removed = self
            .repo
            .unlink_trainer(user_id, trainer_id)
            .await
            .map_err(db_error)?;
        if !removed {
            return Err(AppError::NotFound(NOT_LINKED.into()));
        }
        info!("trainer unlinked");
        Ok(())
    }
}

fn db_error(err: DbError) -> AppError {
    AppError::from_db(err, "Not found")
}
