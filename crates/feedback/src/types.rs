use lectern_shared::kind::EntityKind;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

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
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Flagged,
}

/// A user's review of one course or webinar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub id: String,
    pub user_id: String,
    pub author_name: String,
    pub kind: EntityKind,
    pub entity_id: String,
    pub rating: u8,
    pub title: Option<String>,
    pub content: Option<String>,
    /// The author held a registration for the item when reviewing it.
    pub verified: bool,
    pub status: FeedbackStatus,
    pub moderation_notes: Option<String>,
    pub moderated_by: Option<String>,
    pub moderated_at: Option<i64>,
    pub response: Option<String>,
    pub responded_by: Option<String>,
    pub responded_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, FromRow)]
pub(crate) struct FeedbackRow {
    id: String,
    user_id: String,
    author_name: String,
    kind: sqlx::types::Text<EntityKind>,
    entity_id: String,
    rating: i64,
    title: Option<String>,
    content: Option<String>,
    verified: bool,
    status: sqlx::types::Text<FeedbackStatus>,
    moderation_notes: Option<String>,
    moderated_by: Option<String>,
    moderated_at: Option<i64>,
    response: Option<String>,
    responded_by: Option<String>,
    responded_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl From<FeedbackRow> for Feedback {
    fn from(row: FeedbackRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            author_name: row.author_name,
            kind: row.kind.0,
            entity_id: row.entity_id,
            rating: u8::try_from(row.rating).unwrap_or_default(),
            title: row.title,
            content: row.content,
            verified: row.verified,
            status: row.status.0,
            moderation_notes: row.moderation_notes,
            moderated_by: row.moderated_by,
            moderated_at: row.moderated_at,
            response: row.response,
            responded_by: row.responded_by,
            responded_at: row.responded_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackInput {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[serde(default)]
    #[validate(length(min = 5, max = 200))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 20, max = 2000))]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModerateInput {
    pub status: FeedbackStatus,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RespondInput {
    #[validate(length(min = 1, max = 2000))]
    pub response: String,
}

/// Trims `value`, dropping it when nothing is left.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
