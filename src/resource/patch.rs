//! Serde helpers for nullable columns in `PUT` bodies.
//!
//! A nullable field is `Option<Option<T>>`: a missing key is `None` and leaves
//! the column alone, an explicit `null` is `Some(None)` and clears it. Pair
//! with `#[serde(default, skip_serializing_if = "Option::is_none")]`.

use serde::{Deserialize, Deserializer, Serializer};
use time::Date;

use crate::dates::calendar_date;

/// `deserialize_with` target for `Option<Option<T>>` fields.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `with` target for a nullable `YYYY-MM-DD` column.
pub mod nullable_date {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<Option<Date>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => calendar_date::option::serialize(inner, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<Date>>, D::Error> {
        calendar_date::option::deserialize(deserializer).map(Some)
    }
}
