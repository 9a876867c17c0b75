mod dto;
mod repo;
mod repo_types;

pub use dto::{CreateGoal, UpdateGoal};
pub use repo_types::Goal;

use uuid::Uuid;

use crate::{
    resource::{Entity, ResourceService},
    state::Services,
};

impl Entity for Goal {
    type Create = CreateGoal;
    type Patch = UpdateGoal;

    const NAME: &'static str = "goal";
    const PATH: &'static str = "/goals";

    fn id(&self) -> Uuid {
        self.id
    }

    fn service(services: &Services) -> &ResourceService<Self> {
        &services.goals
    }
}
