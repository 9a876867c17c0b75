//! Persistence seam.
//!
//! Every entity is stored through [`Repository`]; the join queries between
//! users, their owned records and trainers go through [`Relations`]. Two
//! stores implement both: [`PgStore`] for deployments and [`MemoryStore`]
//! for `NODE_ENV=test` and unit tests. The chosen store is built once at
//! startup and handed to each service behind an `Arc`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    goals::Goal, meals::Meal, resource::Entity, trainers::Trainer, users::User,
    workouts::Workout,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub(crate) const EMAIL_TAKEN: &str = "Email already in use";
pub(crate) const GOAL_TAKEN: &str = "User already has a goal";
pub(crate) const UNKNOWN_USER: &str = "Referenced user does not exist";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    /// A unique constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
    /// A foreign key, check or not-null constraint rejected the write.
    #[error("{0}")]
    Constraint(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// CRUD over a single entity type.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn insert(&self, input: E::Create) -> DbResult<E>;
    async fn find_all(&self) -> DbResult<Vec<E>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<E>>;
    /// Merges the provided fields. `None` when no row has `id`.
    async fn update(&self, id: Uuid, patch: E::Patch) -> DbResult<Option<E>>;
    /// `false` when no row has `id`.
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
}

/// Queries that follow the relationships between entities.
///
/// | relation        | cardinality | on user delete   |
/// |-----------------|-------------|------------------|
/// | user → workouts | 1 : n       | `UserId` nulled  |
/// | user → meals    | 1 : n       | `UserId` nulled  |
/// | user → goal     | 1 : 0..1    | `UserId` nulled  |
/// | user ↔ trainers | n : m       | join row removed |
#[async_trait]
pub trait Relations: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;
    async fn workouts_by_user(&self, user_id: Uuid) -> DbResult<Vec<Workout>>;
    async fn meals_by_user(&self, user_id: Uuid) -> DbResult<Vec<Meal>>;
    async fn goal_by_user(&self, user_id: Uuid) -> DbResult<Option<Goal>>;
    async fn trainers_by_user(&self, user_id: Uuid) -> DbResult<Vec<Trainer>>;
    async fn users_by_trainer(&self, trainer_id: Uuid) -> DbResult<Vec<User>>;
    /// Idempotent.
    async fn link_trainer(&self, user_id: Uuid, trainer_id: Uuid) -> DbResult<()>;
    /// `false` when the pair was not linked.
    async fn unlink_trainer(&self, user_id: Uuid, trainer_id: Uuid) -> DbResult<bool>;
}

/// Everything a backing store has to provide.
pub trait Store:
    Repository<User>
    + Repository<Workout>
    + Repository<Meal>
    + Repository<Goal>
    + Repository<Trainer>
    + Relations
{
}

impl<T> Store for T where
    T: Repository<User>
        + Repository<Workout>
        + Repository<Meal>
        + Repository<Goal>
        + Repository<Trainer>
        + Relations
{
}
