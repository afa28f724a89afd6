use std::ops::Deref;

use lectern_db::table;
use sea_query::{Expr, ExprTrait, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::{
    Question, QuestionStatus, QuestionThread, Reply,
    types::{QuestionRow, ReplyRow},
};

/// Upper bound on questions returned by one listing.
pub const MAX_LIMIT: u64 = 100;

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

impl Deref for Query {
    type Target = sqlx::SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn select_questions() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            table::Question::Id,
            table::Question::UserId,
            table::Question::AuthorName,
            table::Question::Title,
            table::Question::Content,
            table::Question::Kind,
            table::Question::EntityId,
            table::Question::Status,
            table::Question::ResolutionNotes,
            table::Question::FirstResponseAt,
            table::Question::ResolvedAt,
            table::Question::ClosedAt,
            table::Question::CreatedAt,
            table::Question::UpdatedAt,
        ])
        .from(table::Question::Table)
        .to_owned()
}

impl Query {
    async fn fetch_all(&self, statement: SelectStatement) -> lectern_shared::Result<Vec<Question>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, QuestionRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub async fn find(&self, id: impl Into<String>) -> lectern_shared::Result<Option<Question>> {
        let statement = select_questions()
            .and_where(Expr::col(table::Question::Id).eq(id.into()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, QuestionRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?
            .map(Into::into))
    }

    pub async fn find_thread(
        &self,
        id: impl Into<String>,
    ) -> lectern_shared::Result<Option<QuestionThread>> {
        let id = id.into();
        let Some(question) = self.find(&id).await? else {
            return Ok(None);
        };

        let statement = sea_query::Query::select()
            .columns([
                table::QuestionReply::Id,
                table::QuestionReply::QuestionId,
                table::QuestionReply::AdminId,
                table::QuestionReply::AdminName,
                table::QuestionReply::Body,
                table::QuestionReply::Kind,
                table::QuestionReply::CreatedAt,
            ])
            .from(table::QuestionReply::Table)
            .and_where(Expr::col(table::QuestionReply::QuestionId).eq(id))
            .order_by(table::QuestionReply::CreatedAt, Order::Asc)
            .order_by(table::QuestionReply::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let replies = sqlx::query_as_with::<_, ReplyRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?
            .into_iter()
            .map(Reply::from)
            .collect();

        Ok(Some(QuestionThread { question, replies }))
    }

    /// Questions asked by one user, newest first.
    pub async fn list_by_user(
        &self,
        user_id: impl Into<String>,
    ) -> lectern_shared::Result<Vec<Question>> {
        let statement = select_questions()
            .and_where(Expr::col(table::Question::UserId).eq(user_id.into()))
            .order_by(table::Question::CreatedAt, Order::Desc)
            .order_by(table::Question::Id, Order::Desc)
            .to_owned();

        self.fetch_all(statement).await
    }

    /// Staff queue, oldest first so the longest waiting question leads.
    pub async fn list(
        &self,
        status: Option<QuestionStatus>,
        limit: u64,
    ) -> lectern_shared::Result<Vec<Question>> {
        let mut statement = select_questions()
            .order_by(table::Question::CreatedAt, Order::Asc)
            .order_by(table::Question::Id, Order::Asc)
            .limit(limit.clamp(1, MAX_LIMIT))
            .to_owned();
        if let Some(status) = status {
            statement.and_where(Expr::col(table::Question::Status).eq(status.as_ref()));
        }

        self.fetch_all(statement).await
    }
}
