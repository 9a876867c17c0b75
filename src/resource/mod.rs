//! The generic resource contract shared by users, workouts, meals, goals and
//! trainers: one [`ResourceService`] and one REST router per entity type.

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{error::AppResult, state::Services};

pub mod handlers;
pub mod patch;
pub mod service;

pub use handlers::router;
pub use service::ResourceService;

pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Body accepted by `POST`.
    type Create: Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Body accepted by `PUT`; every field optional.
    type Patch: Serialize + DeserializeOwned + Default + Send + Sync + 'static;

    /// Singular name used in logs.
    const NAME: &'static str;
    /// REST base path.
    const PATH: &'static str;
    const NOT_FOUND: &'static str = "Not found";

    fn id(&self) -> Uuid;

    fn service(services: &Services) -> &ResourceService<Self>;

    /// Runs before the payload reaches the store.
    fn prepare_create(input: Self::Create) -> AppResult<Self::Create> {
        Ok(input)
    }

    fn prepare_update(patch: Self::Patch) -> AppResult<Self::Patch> {
        Ok(patch)
    }
}
