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
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl QuestionStatus {
    /// Status once staff has replied. Only an open question moves.
    pub fn after_reply(self) -> Self {
        match self {
            QuestionStatus::Open => QuestionStatus::InProgress,
            other => other,
        }
    }
}

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
pub enum ReplyKind {
    #[default]
    Answer,
    Clarification,
    Followup,
    Closing,
}

/// A learner's question, optionally about one catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: String,
    pub user_id: String,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub kind: Option<EntityKind>,
    pub entity_id: Option<String>,
    pub status: QuestionStatus,
    pub resolution_notes: Option<String>,
    pub first_response_at: Option<i64>,
    pub resolved_at: Option<i64>,
    pub closed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, FromRow)]
pub(crate) struct QuestionRow {
    id: String,
    user_id: String,
    author_name: String,
    title: String,
    content: String,
    kind: Option<sqlx::types::Text<EntityKind>>,
    entity_id: Option<String>,
    status: sqlx::types::Text<QuestionStatus>,
    resolution_notes: Option<String>,
    first_response_at: Option<i64>,
    resolved_at: Option<i64>,
    closed_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            author_name: row.author_name,
            title: row.title,
            content: row.content,
            kind: row.kind.map(|kind| kind.0),
            entity_id: row.entity_id,
            status: row.status.0,
            resolution_notes: row.resolution_notes,
            first_response_at: row.first_response_at,
            resolved_at: row.resolved_at,
            closed_at: row.closed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub id: String,
    pub question_id: String,
    pub admin_id: String,
    pub admin_name: String,
    pub body: String,
    pub kind: ReplyKind,
    pub created_at: i64,
}

#[derive(Debug, FromRow)]
pub(crate) struct ReplyRow {
    id: String,
    question_id: String,
    admin_id: String,
    admin_name: String,
    body: String,
    kind: sqlx::types::Text<ReplyKind>,
    created_at: i64,
}

impl From<ReplyRow> for Reply {
    fn from(row: ReplyRow) -> Self {
        Self {
            id: row.id,
            question_id: row.question_id,
            admin_id: row.admin_id,
            admin_name: row.admin_name,
            body: row.body,
            kind: row.kind.0,
            created_at: row.created_at,
        }
    }
}

/// A question with its replies, oldest reply first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionThread {
    #[serde(flatten)]
    pub question: Question,
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AskInput {
    #[validate(length(min = 10, max = 200))]
    pub title: String,
    #[validate(length(min = 30, max = 2000))]
    pub content: String,
    #[serde(default)]
    pub kind: Option<EntityKind>,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub entity_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplyInput {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
    #[serde(default)]
    pub kind: ReplyKind,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ResolveInput {
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
