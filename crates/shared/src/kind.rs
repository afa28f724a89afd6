use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Sellable item family. Registrations and catalog rows are keyed by it.
#[derive(
    EnumString,
    Display,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Course,
    Webinar,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn kind_round_trips_through_lowercase_name() {
        assert_eq!(EntityKind::Course.to_string(), "course");
        assert_eq!(EntityKind::from_str("webinar").unwrap(), EntityKind::Webinar);
        assert!(EntityKind::from_str("workshop").is_err());
    }
}
