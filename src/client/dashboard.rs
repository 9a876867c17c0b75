//! Summaries shown on the workout, meal and goal screens.

use std::collections::BTreeMap;

use time::Date;

use crate::{goals::Goal, meals::Meal, workouts::Workout};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutSummary {
    pub total_minutes: i64,
    /// Number of workouts per type, ordered by type.
    pub by_type: BTreeMap<String, usize>,
}

pub fn summarize_workouts(workouts: &[Workout]) -> WorkoutSummary {
    workouts
        .iter()
        .fold(WorkoutSummary::default(), |mut acc, w| {
            acc.total_minutes += i64::from(w.duration);
            *acc.by_type.entry(w.kind.clone()).or_default() += 1;
            acc
        })
}

/// Meals eaten on `day`, judged by the offset each time was recorded with.
pub fn meals_on(meals: &[Meal], day: Date) -> Vec<&Meal> {
    meals.iter().filter(|m| m.time.date() == day).collect()
}

pub fn calories_on(meals: &[Meal], day: Date) -> i64 {
    meals_on(meals, day)
        .into_iter()
        .map(|m| i64::from(m.calories))
        .sum()
}

/// Splits goals into (active, past) relative to `today`, each sorted by
/// target date. A goal due today is still active.
pub fn split_goals(goals: &[Goal], today: Date) -> (Vec<&Goal>, Vec<&Goal>) {
    let mut sorted: Vec<&Goal> = goals.iter().collect();
    sorted.sort_by_key(|g| g.target_date);
    sorted.into_iter().partition(|g| g.target_date >= today)
}

/// Negative once the target date has passed.
pub fn days_remaining(goal: &Goal, today: Date) -> i64 {
    (goal.target_date - today).whole_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{
        macros::{date, datetime},
        OffsetDateTime,
    };
    use uuid::Uuid;

    fn workout(kind: &str, duration: i32) -> Workout {
        let now = OffsetDateTime::now_utc();
        Workout {
            id: Uuid::new_v4(),
            kind: kind.into(),
            duration,
            date: None,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn meal(calories: i32, time: OffsetDateTime) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            name: "Meal".into(),
            calories,
            time,
            user_id: None,
            created_at: time,
            updated_at: time,
        }
    }

    fn goal(target_date: Date) -> Goal {
        let now = OffsetDateTime::now_utc();
        Goal {
            id: Uuid::new_v4(),
            target_weight: 70.0,
            target_date,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn workout_totals_and_counts() {
        let summary = summarize_workouts(&[
            workout("Cardio", 30),
            workout("Strength", 45),
            workout("Cardio", 20),
        ]);
        assert_eq!(summary.total_minutes, 95);
        assert_eq!(summary.by_type["Cardio"], 2);
        assert_eq!(summary.by_type["Strength"], 1);
        assert_eq!(summarize_workouts(&[]), WorkoutSummary::default());
    }

    #[test]
    fn calories_only_count_the_given_day() {
        let meals = [
            meal(400, datetime!(2024-04-10 08:00 UTC)),
            meal(600, datetime!(2024-04-10 19:30 UTC)),
            meal(900, datetime!(2024-04-11 00:10 UTC)),
        ];
        assert_eq!(calories_on(&meals, date!(2024 - 04 - 10)), 1000);
        assert_eq!(meals_on(&meals, date!(2024 - 04 - 11)).len(), 1);
        assert_eq!(calories_on(&meals, date!(2024 - 04 - 12)), 0);
    }

    #[test]
    fn goals_split_on_today() {
        let today = date!(2024 - 06 - 01);
        let goals = [
            goal(date!(2024 - 12 - 31)),
            goal(date!(2024 - 01 - 01)),
            goal(today),
        ];
        let (active, past) = split_goals(&goals, today);
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].target_date, today);
        assert_eq!(past.len(), 1);
        assert_eq!(days_remaining(active[1], today), 213);
        assert_eq!(days_remaining(past[0], today), -152);
    }
}
