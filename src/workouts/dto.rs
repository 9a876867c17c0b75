use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::{
    dates::calendar_date,
    resource::patch::{nullable, nullable_date},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkout {
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: i32,
    #[serde(with = "calendar_date::option", default)]
    pub date: Option<Date>,
    /// Taken as given; not checked against the caller's session.
    #[serde(rename = "UserId", default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkout {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(with = "nullable_date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Option<Date>>,
    /// `null` detaches the record from its user.
    #[serde(
        rename = "UserId",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<Option<Uuid>>,
}
