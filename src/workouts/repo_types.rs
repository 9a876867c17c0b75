use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::calendar_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "workout_type")]
    pub kind: String,
    pub duration: i32, // minutes
    #[serde(with = "calendar_date::option", default)]
    pub date: Option<Date>,
    #[serde(rename = "UserId", default)]
    pub user_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
