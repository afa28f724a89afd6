use std::{fmt, ops::Deref, str::FromStr};

use lectern_db::table::Registration;
use lectern_shared::kind::EntityKind;
use sea_query::{Cond, Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;

use crate::{RawTimestamp, RegistrationEvent};

/// Rows fetched per round trip when reading the whole log.
pub const PAGE_SIZE: u64 = 500;

#[derive(Debug, FromRow)]
struct RegistrationRow {
    id: String,
    kind: sqlx::types::Text<EntityKind>,
    entity_id: Option<String>,
    user_id: Option<String>,
    created_at: Option<String>,
    recorded_at: i64,
}

impl From<RegistrationRow> for RegistrationEvent {
    fn from(row: RegistrationRow) -> Self {
        Self {
            id: row.id,
            kind: row.kind.0,
            entity_id: row.entity_id,
            user_id: row.user_id,
            created_at: row
                .created_at
                .and_then(|raw| serde_json::from_str::<Option<RawTimestamp>>(&raw).ok())
                .flatten(),
            recorded_at: row.recorded_at,
        }
    }
}

/// Position after the last event of a page, ordered by `(recorded_at, id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub recorded_at: i64,
    pub id: String,
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.recorded_at, self.id)
    }
}

impl FromStr for Cursor {
    type Err = lectern_shared::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((recorded_at, id)) = s.split_once('_') else {
            lectern_shared::user!("Invalid cursor");
        };

        let Ok(recorded_at) = recorded_at.parse() else {
            lectern_shared::user!("Invalid cursor");
        };

        Ok(Self {
            recorded_at,
            id: id.to_owned(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub events: Vec<RegistrationEvent>,
    pub next: Option<Cursor>,
}

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

impl Deref for Query {
    type Target = sqlx::SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn select_events() -> sea_query::SelectStatement {
    sea_query::Query::select()
        .columns([
            Registration::Id,
            Registration::Kind,
            Registration::EntityId,
            Registration::UserId,
            Registration::CreatedAt,
            Registration::RecordedAt,
        ])
        .from(Registration::Table)
        .to_owned()
}

impl Query {
    /// Oldest first, `limit` events after `after`.
    pub async fn list_page(
        &self,
        after: Option<&Cursor>,
        limit: u64,
    ) -> lectern_shared::Result<Page> {
        let limit = limit.clamp(1, PAGE_SIZE);
        let mut statement = select_events()
            .order_by(Registration::RecordedAt, Order::Asc)
            .order_by(Registration::Id, Order::Asc)
            .limit(limit)
            .to_owned();

        if let Some(after) = after {
            statement.cond_where(
                Cond::any()
                    .add(Expr::col(Registration::RecordedAt).gt(after.recorded_at))
                    .add(
                        Cond::all()
                            .add(Expr::col(Registration::RecordedAt).eq(after.recorded_at))
                            .add(Expr::col(Registration::Id).gt(after.id.as_str())),
                    ),
            );
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let events: Vec<RegistrationEvent> =
            sqlx::query_as_with::<_, RegistrationRow, _>(&sql, values)
                .fetch_all(&self.0)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();

        let next = if events.len() as u64 == limit {
            events.last().map(|event| Cursor {
                recorded_at: event.recorded_at,
                id: event.id.to_owned(),
            })
        } else {
            None
        };

        Ok(Page { events, next })
    }

    /// Full snapshot of the log, read page by page.
    pub async fn list_all(&self) -> lectern_shared::Result<Vec<RegistrationEvent>> {
        let mut events = vec![];
        let mut cursor = None;

        loop {
            let page = self.list_page(cursor.as_ref(), PAGE_SIZE).await?;
            events.extend(page.events);

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(events)
    }

    /// Registrations of one user, newest first.
    pub async fn list_by_user(
        &self,
        user_id: impl Into<String>,
    ) -> lectern_shared::Result<Vec<RegistrationEvent>> {
        let statement = select_events()
            .and_where(Expr::col(Registration::UserId).eq(user_id.into()))
            .order_by(Registration::RecordedAt, Order::Desc)
            .order_by(Registration::Id, Order::Desc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, RegistrationRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub async fn is_registered(
        &self,
        user_id: &str,
        kind: EntityKind,
        entity_id: &str,
    ) -> lectern_shared::Result<bool> {
        let statement = sea_query::Query::select()
            .column(Registration::Id)
            .from(Registration::Table)
            .and_where(Expr::col(Registration::UserId).eq(user_id))
            .and_where(Expr::col(Registration::Kind).eq(kind.as_ref()))
            .and_where(Expr::col(Registration::EntityId).eq(entity_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(row.is_some())
    }
}
