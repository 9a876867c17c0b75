mod dto;
mod repo;
mod repo_types;

pub use dto::{CreateTrainer, UpdateTrainer};
pub use repo_types::Trainer;

use uuid::Uuid;

use crate::{
    resource::{Entity, ResourceService},
    state::Services,
};

impl Entity for Trainer {
    type Create = CreateTrainer;
    type Patch = UpdateTrainer;

    const NAME: &'static str = "trainer";
    const PATH: &'static str = "/trainers";

    fn id(&self) -> Uuid {
        self.id
    }

    fn service(services: &Services) -> &ResourceService<Self> {
        &services.trainers
    }
}
