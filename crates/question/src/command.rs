use std::ops::Deref;

use lectern_db::table;
use lectern_identity::Session;
use lectern_shared::{State, now_millis};
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqliteConnection;
use ulid::Ulid;
use validator::Validate;

use crate::{
    AskInput, Question, QuestionStatus, Reply, ReplyInput, ResolveInput, types::trimmed,
};

#[derive(Clone)]
pub struct Command(pub State);

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Status and first reply time of a question, read inside the caller's
/// transaction.
async fn current(
    conn: &mut SqliteConnection,
    id: &str,
) -> lectern_shared::Result<Option<(QuestionStatus, Option<i64>)>> {
    let statement = sea_query::Query::select()
        .columns([table::Question::Status, table::Question::FirstResponseAt])
        .from(table::Question::Table)
        .and_where(Expr::col(table::Question::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (sqlx::types::Text<QuestionStatus>, Option<i64>), _>(
        &sql, values,
    )
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|(status, first_response_at)| (status.0, first_response_at)))
}

impl Command {
    /// Opens a question. A related item must be named by both kind and id
    /// and may be archived.
    pub async fn ask(
        &self,
        session: &Session,
        mut input: AskInput,
    ) -> lectern_shared::Result<Question> {
        input.title = input.title.trim().to_owned();
        input.content = input.content.trim().to_owned();
        input.entity_id = trimmed(input.entity_id);
        input.validate()?;

        match (input.kind, input.entity_id.as_deref()) {
            (Some(kind), Some(entity_id)) => {
                let catalog = lectern_catalog::Query(self.read_db.clone());
                if !catalog.exists(kind, entity_id, true).await? {
                    lectern_shared::not_found!("{kind} {entity_id}");
                }
            }
            (None, None) => {}
            _ => lectern_shared::user!("A related item needs both a kind and an id"),
        }

        let now = now_millis();
        let question = Question {
            id: Ulid::new().to_string(),
            user_id: session.user_id.to_owned(),
            author_name: session.author_name(),
            title: input.title,
            content: input.content,
            kind: input.kind,
            entity_id: input.entity_id,
            status: QuestionStatus::Open,
            resolution_notes: None,
            first_response_at: None,
            resolved_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        };

        let statement = sea_query::Query::insert()
            .into_table(table::Question::Table)
            .columns([
                table::Question::Id,
                table::Question::UserId,
                table::Question::AuthorName,
                table::Question::Title,
                table::Question::Content,
                table::Question::Kind,
                table::Question::EntityId,
                table::Question::Status,
                table::Question::CreatedAt,
                table::Question::UpdatedAt,
            ])
            .values_panic([
                question.id.to_owned().into(),
                question.user_id.to_owned().into(),
                question.author_name.to_owned().into(),
                question.title.to_owned().into(),
                question.content.to_owned().into(),
                question.kind.map(|kind| kind.to_string()).into(),
                question.entity_id.to_owned().into(),
                question.status.to_string().into(),
                question.created_at.into(),
                question.updated_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        tracing::info!(question_id = %question.id, user_id = %question.user_id, "question asked");

        Ok(question)
    }

    /// Adds a staff reply. The first reply stamps `first_response_at` and
    /// moves an open question to in progress.
    pub async fn reply(
        &self,
        id: impl Into<String>,
        admin: &Session,
        mut input: ReplyInput,
    ) -> lectern_shared::Result<Reply> {
        input.body = input.body.trim().to_owned();
        input.validate()?;

        let id = id.into();
        let mut tx = self.write_db.begin().await?;

        let Some((status, first_response_at)) = current(&mut tx, &id).await? else {
            lectern_shared::not_found!("question {id}");
        };

        if status == QuestionStatus::Closed {
            lectern_shared::user!("This question is closed");
        }

        let now = now_millis();
        let reply = Reply {
            id: Ulid::new().to_string(),
            question_id: id.to_owned(),
            admin_id: admin.user_id.to_owned(),
            admin_name: admin.author_name(),
            body: input.body,
            kind: input.kind,
            created_at: now,
        };

        let statement = sea_query::Query::insert()
            .into_table(table::QuestionReply::Table)
            .columns([
                table::QuestionReply::Id,
                table::QuestionReply::QuestionId,
                table::QuestionReply::AdminId,
                table::QuestionReply::AdminName,
                table::QuestionReply::Body,
                table::QuestionReply::Kind,
                table::QuestionReply::CreatedAt,
            ])
            .values_panic([
                reply.id.to_owned().into(),
                reply.question_id.to_owned().into(),
                reply.admin_id.to_owned().into(),
                reply.admin_name.to_owned().into(),
                reply.body.to_owned().into(),
                reply.kind.to_string().into(),
                reply.created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let statement = sea_query::Query::update()
            .table(table::Question::Table)
            .value(table::Question::Status, status.after_reply().to_string())
            .value(
                table::Question::FirstResponseAt,
                first_response_at.unwrap_or(now),
            )
            .value(table::Question::UpdatedAt, now)
            .and_where(Expr::col(table::Question::Id).eq(id.as_str()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(question_id = %id, reply_id = %reply.id, kind = %reply.kind, "question answered");

        Ok(reply)
    }

    /// Marks a question resolved. Notes are kept from an earlier resolution
    /// when none are given.
    pub async fn resolve(
        &self,
        id: impl Into<String>,
        mut input: ResolveInput,
    ) -> lectern_shared::Result<()> {
        input.notes = trimmed(input.notes);
        input.validate()?;

        let id = id.into();
        let mut tx = self.write_db.begin().await?;

        let Some((status, _)) = current(&mut tx, &id).await? else {
            lectern_shared::not_found!("question {id}");
        };

        if status == QuestionStatus::Closed {
            lectern_shared::user!("This question is closed");
        }

        let now = now_millis();
        let mut statement = sea_query::Query::update()
            .table(table::Question::Table)
            .value(table::Question::Status, QuestionStatus::Resolved.to_string())
            .value(table::Question::ResolvedAt, now)
            .value(table::Question::UpdatedAt, now)
            .and_where(Expr::col(table::Question::Id).eq(id.as_str()))
            .to_owned();
        if let Some(notes) = input.notes {
            statement.value(table::Question::ResolutionNotes, notes);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(question_id = %id, "question resolved");

        Ok(())
    }

    /// Closes a question for good. Closing twice keeps the first `closed_at`.
    pub async fn close(&self, id: impl Into<String>) -> lectern_shared::Result<()> {
        let id = id.into();
        let now = now_millis();
        let statement = sea_query::Query::update()
            .table(table::Question::Table)
            .value(table::Question::Status, QuestionStatus::Closed.to_string())
            .value(table::Question::ClosedAt, now)
            .value(table::Question::UpdatedAt, now)
            .and_where(Expr::col(table::Question::Id).eq(id.as_str()))
            .and_where(Expr::col(table::Question::Status).ne(QuestionStatus::Closed.as_ref()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!(question_id = %id, "question closed");
            return Ok(());
        }

        let query = crate::Query(self.write_db.clone());
        if query.find(&id).await?.is_none() {
            lectern_shared::not_found!("question {id}");
        }

        Ok(())
    }
}
