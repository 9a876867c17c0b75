use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{CreateTrainer, Trainer, UpdateTrainer};
use crate::db::{
    memory::{InMemory, Tables},
    DbResult, PgStore, Repository,
};

#[async_trait]
impl Repository<Trainer> for PgStore {
    async fn insert(&self, input: CreateTrainer) -> DbResult<Trainer> {
        let trainer = sqlx::query_as::<_, Trainer>(
            r#"
            INSERT INTO trainers (id, name, specialization)
            VALUES ($1, $2, $3)
            RETURNING id, name, specialization, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.specialization)
        .fetch_one(&self.pool)
        .await?;
        Ok(trainer)
    }

    async fn find_all(&self) -> DbResult<Vec<Trainer>> {
        let rows = sqlx::query_as::<_, Trainer>(
            r#"
            SELECT id, name, specialization, created_at, updated_at
            FROM trainers
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Trainer>> {
        let row = sqlx::query_as::<_, Trainer>(
            r#"
            SELECT id, name, specialization, created_at, updated_at
            FROM trainers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: UpdateTrainer) -> DbResult<Option<Trainer>> {
        let row = sqlx::query_as::<_, Trainer>(
            r#"
            UPDATE trainers
               SET name           = COALESCE($2, name),
                   specialization = COALESCE($3, specialization),
                   updated_at     = now()
             WHERE id = $1
            RETURNING id, name, specialization, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.specialization)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let done = sqlx::query("DELETE FROM trainers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

impl InMemory for Trainer {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.trainers
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.trainers
    }

    fn build(id: Uuid, now: OffsetDateTime, input: CreateTrainer) -> Self {
        Self {
            id,
            name: input.name,
            specialization: input.specialization,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateTrainer, now: OffsetDateTime) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(specialization) = patch.specialization {
            self.specialization = specialization;
        }
        self.updated_at = now;
    }

    fn on_delete(id: Uuid, tables: &mut Tables) {
        tables.user_trainers.retain(|link| link.trainer_id != id);
    }
}
