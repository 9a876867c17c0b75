use crate::{
    goals::{CreateGoal, Goal, UpdateGoal},
    meals::{CreateMeal, Meal, UpdateMeal},
    resource::Entity,
    trainers::{CreateTrainer, Trainer, UpdateTrainer},
    users::{CreateUser, UpdateUser, User},
    workouts::{CreateWorkout, UpdateWorkout, Workout},
};

/// How a record fills the add/edit form, and how a submitted form becomes an
/// update.
pub trait FormModel: Entity {
    fn prefill(&self) -> Self::Create;
    fn into_patch(form: Self::Create) -> Self::Patch;
}

impl FormModel for User {
    /// The password field starts blank.
    fn prefill(&self) -> CreateUser {
        CreateUser {
            name: self.name.clone(),
            email: self.email.clone(),
            password: String::new(),
        }
    }

    /// A blank password keeps the current one.
    fn into_patch(form: CreateUser) -> UpdateUser {
        UpdateUser {
            name: Some(form.name),
            email: Some(form.email),
            password: Some(form.password).filter(|p| !p.is_empty()),
        }
    }
}

impl FormModel for Workout {
    fn prefill(&self) -> CreateWorkout {
        CreateWorkout {
            kind: self.kind.clone(),
            duration: self.duration,
            date: self.date,
            user_id: self.user_id,
        }
    }

    fn into_patch(form: CreateWorkout) -> UpdateWorkout {
        UpdateWorkout {
            kind: Some(form.kind),
            duration: Some(form.duration),
            date: Some(form.date),
            user_id: Some(form.user_id),
        }
    }
}

impl FormModel for Meal {
    fn prefill(&self) -> CreateMeal {
        CreateMeal {
            name: self.name.clone(),
            calories: self.calories,
            time: self.time,
            user_id: self.user_id,
        }
    }

    fn into_patch(form: CreateMeal) -> UpdateMeal {
        UpdateMeal {
            name: Some(form.name),
            calories: Some(form.calories),
            time: Some(form.time),
            user_id: Some(form.user_id),
        }
    }
}

impl FormModel for Goal {
    fn prefill(&self) -> CreateGoal {
        CreateGoal {
            target_weight: self.target_weight,
            target_date: self.target_date,
            user_id: self.user_id,
        }
    }

    fn into_patch(form: CreateGoal) -> UpdateGoal {
        UpdateGoal {
            target_weight: Some(form.target_weight),
            target_date: Some(form.target_date),
            user_id: Some(form.user_id),
        }
    }
}

impl FormModel for Trainer {
    fn prefill(&self) -> CreateTrainer {
        CreateTrainer {
            name: self.name.clone(),
            specialization: self.specialization.clone(),
        }
    }

    fn into_patch(form: CreateTrainer) -> UpdateTrainer {
        UpdateTrainer {
            name: Some(form.name),
            specialization: Some(form.specialization),
        }
    }
}
