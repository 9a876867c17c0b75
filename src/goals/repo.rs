use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{CreateGoal, Goal, UpdateGoal};
use crate::db::{
    memory::{InMemory, Tables},
    DbError, DbResult, PgStore, Repository, GOAL_TAKEN, UNKNOWN_USER,
};

#[async_trait]
impl Repository<Goal> for PgStore {
    async fn insert(&self, input: CreateGoal) -> DbResult<Goal> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (id, target_weight, target_date, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, target_weight, target_date, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.target_weight)
        .bind(input.target_date)
        .bind(input.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(goal)
    }

    async fn find_all(&self) -> DbResult<Vec<Goal>> {
        let rows = sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, target_weight, target_date, user_id, created_at, updated_at
            FROM goals
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Goal>> {
        let row = sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, target_weight, target_date, user_id, created_at, updated_at
            FROM goals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: UpdateGoal) -> DbResult<Option<Goal>> {
        let row = sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals
               SET target_weight = COALESCE($2, target_weight),
                   target_date   = COALESCE($3, target_date),
                   user_id       = CASE WHEN $5 THEN $4 ELSE user_id END,
                   updated_at    = now()
             WHERE id = $1
            RETURNING id, target_weight, target_date, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.target_weight)
        .bind(patch.target_date)
        .bind(patch.user_id.flatten())
        .bind(patch.user_id.is_some())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let done = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

impl InMemory for Goal {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.goals
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.goals
    }

    fn build(id: Uuid, now: OffsetDateTime, input: CreateGoal) -> Self {
        Self {
            id,
            target_weight: input.target_weight,
            target_date: input.target_date,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateGoal, now: OffsetDateTime) {
        if let Some(weight) = patch.target_weight {
            self.target_weight = weight;
        }
        if let Some(date) = patch.target_date {
            self.target_date = date;
        }
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        self.updated_at = now;
    }

    fn check(&self, tables: &Tables) -> DbResult<()> {
        let Some(user_id) = self.user_id else {
            return Ok(());
        };
        if !tables.user_exists(user_id) {
            return Err(DbError::Constraint(UNKNOWN_USER.into()));
        }
        let taken = tables
            .goals
            .iter()
            .any(|g| g.id != self.id && g.user_id == Some(user_id));
        if taken {
            return Err(DbError::Conflict(GOAL_TAKEN.into()));
        }
        Ok(())
    }
}
