use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{CreateUser, UpdateUser, User};
use crate::db::{
    memory::{InMemory, Tables},
    DbError, DbResult, PgStore, Repository, EMAIL_TAKEN,
};

#[async_trait]
impl Repository<User> for PgStore {
    async fn insert(&self, input: CreateUser) -> DbResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_all(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UpdateUser) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name          = COALESCE($2, name),
                   email         = COALESCE($3, email),
                   password_hash = COALESCE($4, password_hash),
                   updated_at    = now()
             WHERE id = $1
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.password)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let done = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

impl InMemory for User {
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.users
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.users
    }

    fn build(id: Uuid, now: OffsetDateTime, input: CreateUser) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            password_hash: input.password,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateUser, now: OffsetDateTime) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(hash) = patch.password {
            self.password_hash = hash;
        }
        self.updated_at = now;
    }

    fn check(&self, tables: &Tables) -> DbResult<()> {
        let taken = tables
            .users
            .iter()
            .any(|u| u.id != self.id && u.email == self.email);
        if taken {
            return Err(DbError::Conflict(EMAIL_TAKEN.into()));
        }
        Ok(())
    }

    fn on_delete(id: Uuid, tables: &mut Tables) {
        for w in tables.workouts.iter_mut().filter(|w| w.user_id == Some(id)) {
            w.user_id = None;
        }
        for m in tables.meals.iter_mut().filter(|m| m.user_id == Some(id)) {
            m.user_id = None;
        }
        for g in tables.goals.iter_mut().filter(|g| g.user_id == Some(id)) {
            g.user_id = None;
        }
        tables.user_trainers.retain(|link| link.user_id != id);
    }
}
