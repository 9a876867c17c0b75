use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::{dates::calendar_date, resource::patch::nullable};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoal {
    pub target_weight: f64,
    #[serde(with = "calendar_date")]
    pub target_date: Date,
    #[serde(rename = "UserId", default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(
        with = "calendar_date::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_date: Option<Date>,
    /// `null` detaches the record from its user.
    #[serde(
        rename = "UserId",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<Option<Uuid>>,
}
