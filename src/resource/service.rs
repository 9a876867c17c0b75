use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::Entity;
use crate::{
    db::Repository,
    error::{AppError, AppResult},
};

/// CRUD over one entity type, translating store failures into [`AppError`].
pub struct ResourceService<E: Entity> {
    repo: Arc<dyn Repository<E>>,
}

impl<E: Entity> Clone for ResourceService<E> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<E: Entity> ResourceService<E> {
    pub fn new(repo: Arc<dyn Repository<E>>) -> Self {
        Self { repo }
    }

    #[instrument(skip_all, fields(entity = E::NAME))]
    pub async fn create(&self, input: E::Create) -> AppResult<E> {
        let input = E::prepare_create(input)?;
        let record = self.repo.insert(input).await.map_err(db_error::<E>)?;
        info!(id = %record.id(), "created");
        Ok(record)
    }

    pub async fn list(&self) -> AppResult<Vec<E>> {
        self.repo.find_all().await.map_err(db_error::<E>)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<E> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(db_error::<E>)?
            .ok_or_else(|| AppError::NotFound(E::NOT_FOUND.into()))
    }

    /// Like [`get`](Self::get) but an absent row is `None`.
    pub async fn find(&self, id: Uuid) -> AppResult<Option<E>> {
        self.repo.find_by_id(id).await.map_err(db_error::<E>)
    }

    #[instrument(skip(self, patch), fields(entity = E::NAME))]
    pub async fn update(&self, id: Uuid, patch: E::Patch) -> AppResult<E> {
        let patch = E::prepare_update(patch)?;
        let record = self
            .repo
            .update(id, patch)
            .await
            .map_err(db_error::<E>)?
            .ok_or_else(|| AppError::NotFound(E::NOT_FOUND.into()))?;
        info!("updated");
        Ok(record)
    }

    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete(id).await.map_err(db_error::<E>)? {
            return Err(AppError::NotFound(E::NOT_FOUND.into()));
        }
        info!("deleted");
        Ok(())
    }
}

fn db_error<E: Entity>(err: crate::db::DbError) -> AppError {
    AppError::from_db(err, E::NOT_FOUND)
}
