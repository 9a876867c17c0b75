mod dto;
mod repo;
mod repo_types;

pub use dto::{CreateMeal, UpdateMeal};
pub use repo_types::Meal;

use uuid::Uuid;

use crate::{
    resource::{Entity, ResourceService},
    state::Services,
};

impl Entity for Meal {
    type Create = CreateMeal;
    type Patch = UpdateMeal;

    const NAME: &'static str = "meal";
    const PATH: &'static str = "/meals";

    fn id(&self) -> Uuid {
        self.id
    }

    fn service(services: &Services) -> &ResourceService<Self> {
        &services.meals
    }
}
