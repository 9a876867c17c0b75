//! Wire formats for calendar dates and timestamps.

use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

// `YYYY-MM-DD`, with an `option` submodule for nullable fields.
time::serde::format_description!(pub calendar_date, Date, "[year]-[month]-[day]");

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
}

pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use time::macros::{date, datetime};

    #[derive(Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "calendar_date")]
        day: Date,
        #[serde(with = "calendar_date::option")]
        maybe: Option<Date>,
    }

    #[test]
    fn dates_use_iso_calendar_form() {
        let json = serde_json::to_string(&Holder {
            day: date!(2024 - 04 - 10),
            maybe: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"day":"2024-04-10","maybe":null}"#);

        let back: Holder = serde_json::from_str(r#"{"day":"2025-01-31","maybe":"2025-02-01"}"#).unwrap();
        assert_eq!(back.day, date!(2025 - 01 - 31));
        assert_eq!(back.maybe, Some(date!(2025 - 02 - 01)));
    }

    #[test]
    fn helpers_format_and_parse() {
        assert_eq!(format_date(date!(2024 - 04 - 10)), "2024-04-10");
        assert_eq!(parse_date(" 2024-04-10 ").unwrap(), date!(2024 - 04 - 10));
        assert!(parse_date("10/04/2024").is_err());

        let ts = datetime!(2024-04-10 08:30 UTC);
        assert_eq!(format_timestamp(ts), "2024-04-10T08:30:00Z");
        assert_eq!(parse_timestamp("2024-04-10T08:30:00Z").unwrap(), ts);
    }
}
