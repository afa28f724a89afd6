use std::collections::BTreeMap;

use lectern_shared::kind::EntityKind;
use serde::Serialize;

use crate::RegistrationEvent;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateStat {
    pub count: u64,
    pub last_timestamp: Option<i64>,
}

impl AggregateStat {
    fn record(self, timestamp: Option<i64>) -> Self {
        Self {
            count: self.count + 1,
            last_timestamp: self.last_timestamp.max(timestamp),
        }
    }
}

/// Per-entity statistics for one kind. Unknown entities read as zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatMap(BTreeMap<String, AggregateStat>);

impl StatMap {
    pub fn get(&self, entity_id: &str) -> AggregateStat {
        self.0.get(entity_id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregateStat)> {
        self.0.iter().map(|(id, stat)| (id.as_str(), stat))
    }

    /// Number of counted events, across every entity.
    pub fn total(&self) -> u64 {
        self.0.values().map(|stat| stat.count).sum()
    }
}

/// Folds the log into per-entity counts and latest timestamps for `kind`.
///
/// Events of another kind or without an entity are skipped. An event whose
/// timestamp cannot be read is still counted.
pub fn aggregate<'a>(
    events: impl IntoIterator<Item = &'a RegistrationEvent>,
    kind: EntityKind,
) -> StatMap {
    let stats = events
        .into_iter()
        .filter(|event| event.kind == kind)
        .filter_map(|event| event.entity_id().map(|id| (id, event.timestamp())))
        .fold(
            BTreeMap::<String, AggregateStat>::new(),
            |mut stats, (id, timestamp)| {
                let stat = stats.entry(id.to_owned()).or_default();
                *stat = stat.record(timestamp);
                stats
            },
        );

    StatMap(stats)
}
