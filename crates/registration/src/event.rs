use lectern_shared::kind::EntityKind;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::RawTimestamp;

/// One entry of the append-only registration log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationEvent {
    pub id: String,
    pub kind: EntityKind,
    pub entity_id: Option<String>,
    pub user_id: Option<String>,
    pub created_at: Option<RawTimestamp>,
    pub recorded_at: i64,
}

impl RegistrationEvent {
    /// Referenced entity, with empty identifiers treated as missing.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.created_at.as_ref().and_then(RawTimestamp::normalize)
    }
}

/// Client supplied registration record, accepted as-is by the bulk import.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImportRecord {
    pub kind: EntityKind,
    #[serde(default, alias = "entityId")]
    #[validate(length(max = 64))]
    pub entity_id: Option<String>,
    #[serde(default, alias = "userId")]
    #[validate(length(max = 64))]
    pub user_id: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<RawTimestamp>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImportInput {
    #[validate(length(min = 1, max = 1000), nested)]
    pub records: Vec<ImportRecord>,
}
