mod dto;
mod repo;
mod repo_types;

pub use dto::{CreateWorkout, UpdateWorkout};
pub use repo_types::Workout;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    resource::{Entity, ResourceService},
    state::Services,
};

impl Entity for Workout {
    type Create = CreateWorkout;
    type Patch = UpdateWorkout;

    const NAME: &'static str = "workout";
    const PATH: &'static str = "/workouts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn service(services: &Services) -> &ResourceService<Self> {
        &services.workouts
    }

    fn prepare_create(input: CreateWorkout) -> AppResult<CreateWorkout> {
        check_duration(input.duration)?;
        Ok(input)
    }

    fn prepare_update(patch: UpdateWorkout) -> AppResult<UpdateWorkout> {
        if let Some(duration) = patch.duration {
            check_duration(duration)?;
        }
        Ok(patch)
    }
}

fn check_duration(minutes: i32) -> AppResult<()> {
    if minutes < 0 {
        return Err(AppError::Validation("duration must not be negative".into()));
    }
    Ok(())
}
