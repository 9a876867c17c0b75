//! Queries and routes that follow the foreign keys between entities.

mod handlers;
mod repo;
mod service;

pub use handlers::router;
pub use service::RelationService;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the user ↔ trainer join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserTrainer {
    pub user_id: Uuid,
    pub trainer_id: Uuid,
}
