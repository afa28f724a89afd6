use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// A registration time exactly as the client supplied it.
///
/// Deserialization never fails: shapes that are not understood land in
/// [`RawTimestamp::Other`] and normalize to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Structured {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: i64,
    },
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawTimestamp {
    /// Epoch milliseconds, or `None` when the value cannot be read as a time.
    pub fn normalize(&self) -> Option<i64> {
        match self {
            RawTimestamp::Structured {
                seconds,
                nanoseconds,
            } => seconds
                .checked_mul(1_000)?
                .checked_add(nanoseconds / 1_000_000),
            RawTimestamp::Millis(ms) => Some(*ms),
            RawTimestamp::FractionalMillis(ms) => {
                if ms.is_finite() && ms.abs() < i64::MAX as f64 {
                    Some(ms.trunc() as i64)
                } else {
                    None
                }
            }
            RawTimestamp::Text(text) => parse_text(text.trim()),
            RawTimestamp::Other(_) => None,
        }
    }
}

impl From<i64> for RawTimestamp {
    fn from(value: i64) -> Self {
        RawTimestamp::Millis(value)
    }
}

fn to_millis(value: OffsetDateTime) -> Option<i64> {
    i64::try_from(value.unix_timestamp_nanos() / 1_000_000).ok()
}

fn parse_text(text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }

    if let Ok(value) = OffsetDateTime::parse(text, &Rfc3339) {
        return to_millis(value);
    }

    let spaced = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let tee = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

    for format in [spaced, tee] {
        if let Ok(value) = PrimitiveDateTime::parse(text, format) {
            return to_millis(value.assume_utc());
        }
    }

    let date = format_description!("[year]-[month]-[day]");
    Date::parse(text, date)
        .ok()
        .and_then(|value| to_millis(value.midnight().assume_utc()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn normalize(value: serde_json::Value) -> Option<i64> {
        serde_json::from_value::<RawTimestamp>(value)
            .unwrap()
            .normalize()
    }

    #[test]
    fn structured_seconds_are_converted() {
        assert_eq!(
            normalize(json!({"seconds": 1_700_000_000, "nanoseconds": 250_000_000})),
            Some(1_700_000_000_250)
        );
        assert_eq!(
            normalize(json!({"_seconds": 1_700_000_000, "_nanoseconds": 0})),
            Some(1_700_000_000_000)
        );
        assert_eq!(normalize(json!({"seconds": 2})), Some(2_000));
    }

    #[test]
    fn numbers_are_already_millis() {
        assert_eq!(normalize(json!(1_000)), Some(1_000));
        assert_eq!(normalize(json!(1_500.9)), Some(1_500));
        assert_eq!(normalize(json!(1e300)), None);
    }

    #[test]
    fn iso_like_strings_are_read_as_utc() {
        assert_eq!(normalize(json!("1970-01-01T00:00:01Z")), Some(1_000));
        assert_eq!(normalize(json!("1970-01-01T01:00:00+01:00")), Some(0));
        assert_eq!(normalize(json!("2023-11-14 22:13:20")), Some(1_700_000_000_000));
        assert_eq!(normalize(json!("2023-11-14T22:13:20")), Some(1_700_000_000_000));
        assert_eq!(normalize(json!("1970-01-02")), Some(86_400_000));
    }

    #[test]
    fn everything_else_is_absent() {
        assert_eq!(normalize(json!("")), None);
        assert_eq!(normalize(json!("   ")), None);
        assert_eq!(normalize(json!("yesterday")), None);
        assert_eq!(normalize(json!("2023-13-40")), None);
        assert_eq!(normalize(json!(true)), None);
        assert_eq!(normalize(json!([1, 2])), None);
        assert_eq!(normalize(json!({"when": 12})), None);
    }
}
