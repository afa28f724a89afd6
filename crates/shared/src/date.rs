use time::{OffsetDateTime, macros::format_description};

/// Shown in place of a timestamp that is absent or out of range.
pub const MISSING_TIMESTAMP: &str = "—";

pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Human readable UTC rendering of an epoch-millisecond value.
pub fn format_timestamp(millis: Option<i64>) -> String {
    let Some(millis) = millis else {
        return MISSING_TIMESTAMP.to_owned();
    };

    let format = format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .ok()
        .and_then(|date| date.format(&format).ok())
        .unwrap_or_else(|| MISSING_TIMESTAMP.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch_millis_in_utc() {
        assert_eq!(format_timestamp(Some(0)), "1970-01-01 00:00 UTC");
        assert_eq!(
            format_timestamp(Some(1_700_000_000_000)),
            "2023-11-14 22:13 UTC"
        );
    }

    #[test]
    fn absent_timestamp_uses_placeholder() {
        assert_eq!(format_timestamp(None), MISSING_TIMESTAMP);
        assert_eq!(format_timestamp(Some(i64::MAX)), MISSING_TIMESTAMP);
    }
}
