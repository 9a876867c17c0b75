mod dto;
mod repo;
mod repo_types;

pub use dto::{CreateUser, UpdateUser};
pub use repo_types::User;

use uuid::Uuid;

use crate::{
    auth::password::hash_password,
    error::AppResult,
    resource::{Entity, ResourceService},
    state::Services,
};

impl Entity for User {
    type Create = CreateUser;
    type Patch = UpdateUser;

    const NAME: &'static str = "user";
    const PATH: &'static str = "/users";
    const NOT_FOUND: &'static str = "User not found";

    fn id(&self) -> Uuid {
        self.id
    }

    fn service(services: &Services) -> &ResourceService<Self> {
        &services.users
    }

    fn prepare_create(mut input: CreateUser) -> AppResult<CreateUser> {
        input.password = hash_password(&input.password)?;
        Ok(input)
    }

    fn prepare_update(mut patch: UpdateUser) -> AppResult<UpdateUser> {
        if let Some(password) = patch.password.as_deref() {
            patch.password = Some(hash_password(password)?);
        }
        Ok(patch)
    }
}
