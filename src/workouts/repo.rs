use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{CreateWorkout, UpdateWorkout, Workout};
use crate::db::{
    memory::{InMemory, Tables},
    DbError, DbResult, PgStore, Repository, UNKNOWN_USER,
};

#[async_trait]
impl Repository<Workout> for PgStore {
    async fn insert(&self, input: CreateWorkout) -> DbResult<Workout> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts (id, workout_type, duration, date, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, workout_type, duration, date, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.kind)
        .bind(input.duration)
        .bind(input.date)
        .bind(input.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(workout)
    }

    async fn find_all(&self) -> DbResult<Vec<Workout>> {
        let rows = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, workout_type, duration, date, user_id, created_at, updated_at
            FROM workouts
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Workout>> {
        let row = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, workout_type, duration, date, user_id, created_at, updated_at
            FROM workouts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: UpdateWorkout) -> DbResult<Option<Workout>> {
        let row = sqlx::query_as::<_, Workout>(
            r#"
            UPDATE workouts
               SET workout_type = COALESCE($2, workout_type),
                   duration     = COALESCE($3, duration),
                   date         = CASE WHEN $5 THEN $4 ELSE date END,
                   user_id      = CASE WHEN $7 THEN $6 ELSE user_id END,
                   updated_at   = now()
             WHERE id = $1
            RETURNING id, workout_type, duration, date, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.kind)
        .bind(patch.duration)
        .bind(patch.date.flatten())
        .bind(patch.date.is_some())
        .bind(patch.user_id.flatten())
        .bind(patch.user_id.is_some())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let done = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

impl InMemory for Workout {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.workouts
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.workouts
    }

    fn build(id: Uuid, now: OffsetDateTime, input: CreateWorkout) -> Self {
        Self {
            id,
            kind: input.kind,
            duration: input.duration,
            date: input.date,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateWorkout, now: OffsetDateTime) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        self.updated_at = now;
    }

    fn check(&self, tables: &Tables) -> DbResult<()> {
        if self.duration < 0 {
            return Err(DbError::Constraint("duration must not be negative".into()));
        }
        match self.user_id {
            Some(user_id) if !tables.user_exists(user_id) => {
                Err(DbError::Constraint(UNKNOWN_USER.into()))
            }
            _ => Ok(()),
        }
    }
}
