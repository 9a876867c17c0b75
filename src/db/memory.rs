use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DbResult, Repository};
use crate::{
    goals::Goal, meals::Meal, relations::UserTrainer, resource::Entity, trainers::Trainer,
    users::User, workouts::Workout,
};

/// All tables of the in-memory store, kept in insertion order.
#[derive(Debug, Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub workouts: Vec<Workout>,
    pub meals: Vec<Meal>,
    pub goals: Vec<Goal>,
    pub trainers: Vec<Trainer>,
    pub user_trainers: Vec<UserTrainer>,
}

impl Tables {
    pub(crate) fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

/// Store used when `NODE_ENV=test`. Each instance starts empty; it is not
/// shared across processes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// How an entity lives in [`Tables`]. The constraint checks mirror the
/// PostgreSQL schema so both stores reject the same writes.
pub trait InMemory: Entity {
    fn rows(tables: &Tables) -> &Vec<Self>;
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self>;
    fn build(id: Uuid, now: OffsetDateTime, input: Self::Create) -> Self;
    fn apply(&mut self, patch: Self::Patch, now: OffsetDateTime);

    /// Unique and foreign-key checks against every row except `self`.
    fn check(&self, _tables: &Tables) -> DbResult<()> {
        Ok(())
    }

    /// Runs after the row with `id` was removed.
    fn on_delete(_id: Uuid, _tables: &mut Tables) {}
}

#[async_trait]
impl<E: InMemory> Repository<E> for MemoryStore {
    async fn insert(&self, input: E::Create) -> DbResult<E> {
        let mut tables = self.tables.write().await;
        let record = E::build(Uuid::new_v4(), OffsetDateTime::now_utc(), input);
        record.check(&tables)?;
        E::rows_mut(&mut tables).push(record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> DbResult<Vec<E>> {
        let tables = self.tables.read().await;
        Ok(E::rows(&tables).clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<E>> {
        let tables = self.tables.read().await;
        Ok(E::rows(&tables).iter().find(|r| r.id() == id).cloned())
    }

    async fn update(&self, id: Uuid, patch: E::Patch) -> DbResult<Option<E>> {
        let mut tables = self.tables.write().await;
        let Some(pos) = E::rows(&tables).iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let mut updated = E::rows(&tables)[pos].clone();
        updated.apply(patch, OffsetDateTime::now_utc());
        updated.check(&tables)?;
        E::rows_mut(&mut tables)[pos] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        let rows = E::rows_mut(&mut tables);
        let Some(pos) = rows.iter().position(|r| r.id() == id) else {
            return Ok(false);
        };
        rows.remove(pos);
        E::on_delete(id, &mut tables);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{DbError, Relations},
        goals::CreateGoal,
        trainers::{CreateTrainer, UpdateTrainer},
        users::CreateUser,
        workouts::CreateWorkout,
    };
    use time::macros::date;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            name: "Tester".into(),
            email: email.into(),
            password: "hashed".into(),
        }
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = MemoryStore::new();
        for name in ["Ana", "Ben", "Cy"] {
            Repository::<Trainer>::insert(
                &store,
                CreateTrainer {
                    name: name.into(),
                    specialization: "Strength".into(),
                },
            )
            .await
            .unwrap();
        }
        let names: Vec<_> = Repository::<Trainer>::find_all(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["Ana", "Ben", "Cy"]);
    }

    #[tokio::test]
    async fn update_missing_row_returns_none() {
        let store = MemoryStore::new();
        let out = Repository::<Trainer>::update(&store, Uuid::new_v4(), UpdateTrainer::default())
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        Repository::<User>::insert(&store, new_user("a@x.com")).await.unwrap();
        let err = Repository::<User>::insert(&store, new_user("a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn workout_for_unknown_user_is_rejected() {
        let store = MemoryStore::new();
        let err = Repository::<Workout>::insert(
            &store,
            CreateWorkout {
                kind: "Cardio".into(),
                duration: 30,
                date: Some(date!(2024 - 04 - 10)),
                user_id: Some(Uuid::new_v4()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[tokio::test]
    async fn deleting_user_nulls_owned_rows_and_drops_links() {
        let store = MemoryStore::new();
        let user = Repository::<User>::insert(&store, new_user("a@x.com")).await.unwrap();
        let trainer = Repository::<Trainer>::insert(
            &store,
            CreateTrainer {
                name: "Coach".into(),
                specialization: "Yoga".into(),
            },
        )
        .await
        .unwrap();
        let goal = Repository::<Goal>::insert(
            &store,
            CreateGoal {
                target_weight: 70.5,
                target_date: date!(2025 - 01 - 01),
                user_id: Some(user.id),
            },
        )
        .await
        .unwrap();
        store.link_trainer(user.id, trainer.id).await.unwrap();

        assert!(Repository::<User>::delete(&store, user.id).await.unwrap());

        let goal = Repository::<Goal>::find_by_id(&store, goal.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(goal.user_id, None);
        assert!(store.users_by_trainer(trainer.id).await.unwrap().is_empty());
    }
}
