use async_trait::async_trait;
use uuid::Uuid;

use super::UserTrainer;
use crate::{
    db::{DbResult, MemoryStore, PgStore, Relations},
    goals::Goal,
    meals::Meal,
    trainers::Trainer,
    users::User,
    workouts::Workout,
};

#[async_trait]
impl Relations for PgStore {
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn workouts_by_user(&self, user_id: Uuid) -> DbResult<Vec<Workout>> {
        let rows = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, workout_type, duration, date, user_id, created_at, updated_at
            FROM workouts
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn meals_by_user(&self, user_id: Uuid) -> DbResult<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, calories, time, user_id, created_at, updated_at
            FROM meals
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn goal_by_user(&self, user_id: Uuid) -> DbResult<Option<Goal>> {
        let row = sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, target_weight, target_date, user_id, created_at, updated_at
            FROM goals
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn trainers_by_user(&self, user_id: Uuid) -> DbResult<Vec<Trainer>> {
        let rows = sqlx::query_as::<_, Trainer>(
            r#"
            SELECT t.id, t.name, t.specialization, t.created_at, t.updated_at
            FROM trainers t
            JOIN user_trainers ut ON ut.trainer_id = t.id
            WHERE ut.user_id = $1
            ORDER BY t.created_at, t.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn users_by_trainer(&self, trainer_id: Uuid) -> DbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.created_at, u.updated_at
            FROM users u
            JOIN user_trainers ut ON ut.user_id = u.id
            WHERE ut.trainer_id = $1
            ORDER BY u.created_at, u.id
            "#,
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn link_trainer(&self, user_id: Uuid, trainer_id: Uuid) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_trainers (user_id, trainer_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(trainer_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unlink_trainer(&self, user_id: Uuid, trainer_id: Uuid) -> DbResult<bool> {
        let done = sqlx::query("DELETE FROM user_trainers WHERE user_id = $1 AND trainer_id = $2")
            .bind(user_id)
            .bind(trainer_id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

#[async_trait]
impl Relations for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn workouts_by_user(&self, user_id: Uuid) -> DbResult<Vec<Workout>> {
        let tables = self.tables.read().await;
        Ok(tables
            .workouts
            .iter()
            .filter(|w| w.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn meals_by_user(&self, user_id: Uuid) -> DbResult<Vec<Meal>> {
        let tables = self.tables.read().await;
        Ok(tables
            .meals
            .iter()
            .filter(|m| m.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn goal_by_user(&self, user_id: Uuid) -> DbResult<Option<Goal>> {
        let tables = self.tables.read().await;
        Ok(tables
            .goals
            .iter()
            .find(|g| g.user_id == Some(user_id))
            .cloned())
    }

    async fn trainers_by_user(&self, user_id: Uuid) -> DbResult<Vec<Trainer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .trainers
            .iter()
            .filter(|t| {
                tables
                    .user_trainers
                    .contains(&UserTrainer { user_id, trainer_id: t.id })
            })
            .cloned()
            .collect())
    }

    async fn users_by_trainer(&self, trainer_id: Uuid) -> DbResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| {
                tables
                    .user_trainers
                    .contains(&UserTrainer { user_id: u.id, trainer_id })
            })
            .cloned()
            .collect())
    }

    async fn link_trainer(&self, user_id: Uuid, trainer_id: Uuid) -> DbResult<()> {
        let mut tables = self.tables.write().await;
        let link = UserTrainer { user_id, trainer_id };
        if !tables.user_trainers.contains(&link) {
            tables.user_trainers.push(link);
        }
        Ok(())
    }

    async fn unlink_trainer(&self, user_id: Uuid, trainer_id: Uuid) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.user_trainers.len();
        tables
            .user_trainers
            .retain(|l| !(l.user_id == user_id && l.trainer_id == trainer_id));
        Ok(tables.user_trainers.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::Repository,
        goals::CreateGoal,
        meals::CreateMeal,
        trainers::CreateTrainer,
        users::CreateUser,
    };
    use time::macros::{date, datetime};

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        Repository::<User>::insert(
            store,
            CreateUser {
                name: "Dana".into(),
                email: email.into(),
                password: "hash".into(),
            },
        )
        .await
        .unwrap()
    }

    async fn seed_trainer(store: &MemoryStore, name: &str) -> Trainer {
        Repository::<Trainer>::insert(
            store,
            CreateTrainer {
                name: name.into(),
                specialization: "HIIT".into(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn owned_rows_are_filtered_by_user() {
        let store = MemoryStore::new();
        let dana = seed_user(&store, "dana@x.com").await;
        let eli = seed_user(&store, "eli@x.com").await;
        for (user, name) in [(&dana, "Oats"), (&eli, "Rice"), (&dana, "Eggs")] {
            Repository::<Meal>::insert(
                &store,
                CreateMeal {
                    name: name.into(),
                    calories: 300,
                    time: datetime!(2024-04-10 08:00 UTC),
                    user_id: Some(user.id),
                },
            )
            .await
            .unwrap();
        }
        let names: Vec<_> = store
            .meals_by_user(dana.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["Oats", "Eggs"]);
        assert!(store.workouts_by_user(dana.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn goal_lookup_and_email_lookup() {
        let store = MemoryStore::new();
        let dana = seed_user(&store, "dana@x.com").await;
        assert!(store.goal_by_user(dana.id).await.unwrap().is_none());
        Repository::<Goal>::insert(
            &store,
            CreateGoal {
                target_weight: 64.0,
                target_date: date!(2025 - 06 - 01),
                user_id: Some(dana.id),
            },
        )
        .await
        .unwrap();
        let goal = store.goal_by_user(dana.id).await.unwrap().unwrap();
        assert_eq!(goal.target_weight, 64.0);

        let found = store.find_user_by_email("dana@x.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(dana.id));
        assert!(store.find_user_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn link_is_idempotent_and_unlink_reports_absence() {
        let store = MemoryStore::new();
        let dana = seed_user(&store, "dana@x.com").await;
        let coach = seed_trainer(&store, "Coach").await;
        let other = seed_trainer(&store, "Other").await;

        store.link_trainer(dana.id, coach.id).await.unwrap();
        store.link_trainer(dana.id, coach.id).await.unwrap();

        let trainers = store.trainers_by_user(dana.id).await.unwrap();
        assert_eq!(trainers.len(), 1);
        assert_eq!(trainers[0].id, coach.id);
        assert_eq!(store.users_by_trainer(coach.id).await.unwrap().len(), 1);
        assert!(store.users_by_trainer(other.id).await.unwrap().is_empty());

        assert!(store.unlink_trainer(dana.id, coach.id).await.unwrap());
        assert!(!store.unlink_trainer(dana.id, coach.id).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_trainer_drops_its_links() {
        let store = MemoryStore::new();
        let dana = seed_user(&store, "dana@x.com").await;
        let coach = seed_trainer(&store, "Coach").await;
        store.link_trainer(dana.id, coach.id).await.unwrap();

        assert!(Repository::<Trainer>::delete(&store, coach.id).await.unwrap());
        assert!(store.trainers_by_user(dana.id).await.unwrap().is_empty());
    }
}
