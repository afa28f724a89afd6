use lectern_catalog::EntitySummary;
use lectern_shared::{format_timestamp, kind::EntityKind};
use serde::Serialize;

use crate::StatMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityBar {
    pub id: String,
    pub title: String,
    pub archived: bool,
    pub count: u64,
    /// Share of the busiest entity, 0..=100.
    pub percentage: u8,
    pub last_timestamp: Option<i64>,
    pub last_registered: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub kind: EntityKind,
    pub total: u64,
    pub max_count: u64,
    pub entities: Vec<EntityBar>,
}

/// `round(100 * count / max)` with halves rounded up.
fn percentage(count: u64, max: u64) -> u8 {
    let max = max.max(1);
    let count = count.min(max) as u128;
    let max = max as u128;

    ((200 * count + max) / (2 * max)) as u8
}

/// Scales every catalog entity against the busiest one, keeping catalog order.
pub fn present(kind: EntityKind, stats: &StatMap, catalog: &[EntitySummary]) -> Dashboard {
    let max_count = catalog
        .iter()
        .map(|entity| stats.get(&entity.id).count)
        .max()
        .unwrap_or(0)
        .max(1);

    let entities = catalog
        .iter()
        .map(|entity| {
            let stat = stats.get(&entity.id);

            EntityBar {
                id: entity.id.to_owned(),
                title: entity.title.to_owned(),
                archived: entity.is_archived(),
                count: stat.count,
                percentage: percentage(stat.count, max_count),
                last_timestamp: stat.last_timestamp,
                last_registered: format_timestamp(stat.last_timestamp),
            }
        })
        .collect();

    Dashboard {
        kind,
        total: stats.total(),
        max_count,
        entities,
    }
}
