use std::ops::Deref;

use lectern_db::table;
use lectern_shared::kind::EntityKind;
use sea_query::{Expr, ExprTrait, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::{Feedback, FeedbackStatus, RatingSummary, summarize, types::FeedbackRow};

/// Upper bound on reviews returned by one listing.
pub const MAX_LIMIT: u64 = 100;

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

impl Deref for Query {
    type Target = sqlx::SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn select_feedback() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            table::Feedback::Id,
            table::Feedback::UserId,
            table::Feedback::AuthorName,
            table::Feedback::Kind,
            table::Feedback::EntityId,
            table::Feedback::Rating,
            table::Feedback::Title,
            table::Feedback::Content,
            table::Feedback::Verified,
            table::Feedback::Status,
            table::Feedback::ModerationNotes,
            table::Feedback::ModeratedBy,
            table::Feedback::ModeratedAt,
            table::Feedback::Response,
            table::Feedback::RespondedBy,
            table::Feedback::RespondedAt,
            table::Feedback::CreatedAt,
            table::Feedback::UpdatedAt,
        ])
        .from(table::Feedback::Table)
        .to_owned()
}

fn newest_first(statement: &mut SelectStatement) -> &mut SelectStatement {
    statement
        .order_by(table::Feedback::CreatedAt, Order::Desc)
        .order_by(table::Feedback::Id, Order::Desc)
}

impl Query {
    async fn fetch_all(&self, statement: SelectStatement) -> lectern_shared::Result<Vec<Feedback>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, FeedbackRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub async fn find(&self, id: impl Into<String>) -> lectern_shared::Result<Option<Feedback>> {
        let statement = select_feedback()
            .and_where(Expr::col(table::Feedback::Id).eq(id.into()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, FeedbackRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?
            .map(Into::into))
    }

    /// Approved reviews of one item, newest first.
    pub async fn list_for_item(
        &self,
        kind: EntityKind,
        entity_id: &str,
        limit: u64,
    ) -> lectern_shared::Result<Vec<Feedback>> {
        let mut statement = select_feedback()
            .and_where(Expr::col(table::Feedback::Kind).eq(kind.as_ref()))
            .and_where(Expr::col(table::Feedback::EntityId).eq(entity_id))
            .and_where(Expr::col(table::Feedback::Status).eq(FeedbackStatus::Approved.as_ref()))
            .limit(limit.clamp(1, MAX_LIMIT))
            .to_owned();
        newest_first(&mut statement);

        self.fetch_all(statement).await
    }

    /// Rating summary over the approved reviews of one item.
    pub async fn summary(
        &self,
        kind: EntityKind,
        entity_id: &str,
    ) -> lectern_shared::Result<RatingSummary> {
        let statement = sea_query::Query::select()
            .column(table::Feedback::Rating)
            .from(table::Feedback::Table)
            .and_where(Expr::col(table::Feedback::Kind).eq(kind.as_ref()))
            .and_where(Expr::col(table::Feedback::EntityId).eq(entity_id))
            .and_where(Expr::col(table::Feedback::Status).eq(FeedbackStatus::Approved.as_ref()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let ratings = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(summarize(
            ratings
                .into_iter()
                .filter_map(|(rating,)| u8::try_from(rating).ok()),
        ))
    }

    /// Every review written by one user, whatever its status.
    pub async fn list_by_user(
        &self,
        user_id: impl Into<String>,
    ) -> lectern_shared::Result<Vec<Feedback>> {
        let mut statement = select_feedback()
            .and_where(Expr::col(table::Feedback::UserId).eq(user_id.into()))
            .to_owned();
        newest_first(&mut statement);

        self.fetch_all(statement).await
    }

    /// Moderation queue, optionally narrowed to one status.
    pub async fn list(
        &self,
        status: Option<FeedbackStatus>,
        limit: u64,
    ) -> lectern_shared::Result<Vec<Feedback>> {
        let mut statement = select_feedback()
            .limit(limit.clamp(1, MAX_LIMIT))
            .to_owned();
        if let Some(status) = status {
            statement.and_where(Expr::col(table::Feedback::Status).eq(status.as_ref()));
        }
        newest_first(&mut statement);

        self.fetch_all(statement).await
    }
}
