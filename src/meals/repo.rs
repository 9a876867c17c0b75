use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{CreateMeal, Meal, UpdateMeal};
use crate::db::{
    memory::{InMemory, Tables},
    DbError, DbResult, PgStore, Repository, UNKNOWN_USER,
};

#[async_trait]
impl Repository<Meal> for PgStore {
    async fn insert(&self, input: CreateMeal) -> DbResult<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, name, calories, time, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, calories, time, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.calories)
        .bind(input.time)
        .bind(input.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(meal)
    }

    async fn find_all(&self) -> DbResult<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, calories, time, user_id, created_at, updated_at
            FROM meals
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, calories, time, user_id, created_at, updated_at
            FROM meals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: UpdateMeal) -> DbResult<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals
               SET name       = COALESCE($2, name),
                   calories   = COALESCE($3, calories),
                   time       = COALESCE($4, time),
                   user_id    = CASE WHEN $6 THEN $5 ELSE user_id END,
                   updated_at = now()
             WHERE id = $1
            RETURNING id, name, calories, time, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.calories)
        .bind(patch.time)
        .bind(patch.user_id.flatten())
        .bind(patch.user_id.is_some())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let done = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

impl InMemory for Meal {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.meals
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.meals
    }

    fn build(id: Uuid, now: OffsetDateTime, input: CreateMeal) -> Self {
        Self {
            id,
            name: input.name,
            calories: input.calories,
            time: input.time,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateMeal, now: OffsetDateTime) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(calories) = patch.calories {
            self.calories = calories;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        self.updated_at = now;
    }

    fn check(&self, tables: &Tables) -> DbResult<()> {
        match self.user_id {
            Some(user_id) if !tables.user_exists(user_id) => {
                Err(DbError::Constraint(UNKNOWN_USER.into()))
            }
            _ => Ok(()),
        }
    }
}
