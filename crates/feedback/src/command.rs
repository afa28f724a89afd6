use std::ops::Deref;

use lectern_db::table;
use lectern_identity::Session;
use lectern_shared::{State, kind::EntityKind, now_millis};
use sea_query::{Expr, ExprTrait, OnConflict, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use ulid::Ulid;
use validator::Validate;

use crate::{
    Feedback, FeedbackInput, FeedbackStatus, ModerateInput, RespondInput, types::trimmed,
};

#[derive(Clone)]
pub struct Command(pub State);

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    /// Stores a pending review of a listed item. Each user reviews an item
    /// once, and the review is marked verified when they hold a seat for it.
    pub async fn create(
        &self,
        session: &Session,
        kind: EntityKind,
        entity_id: impl Into<String>,
        mut input: FeedbackInput,
    ) -> lectern_shared::Result<Feedback> {
        input.title = trimmed(input.title);
        input.content = trimmed(input.content);
        input.validate()?;

        let entity_id = entity_id.into();
        let catalog = lectern_catalog::Query(self.read_db.clone());
        if !catalog.exists(kind, &entity_id, false).await? {
            lectern_shared::not_found!("{kind} {entity_id}");
        }

        let registrations = lectern_registration::Query(self.read_db.clone());
        let verified = registrations
            .is_registered(&session.user_id, kind, &entity_id)
            .await?;

        let now = now_millis();
        let feedback = Feedback {
            id: Ulid::new().to_string(),
            user_id: session.user_id.to_owned(),
            author_name: session.author_name(),
            kind,
            entity_id,
            rating: input.rating,
            title: input.title,
            content: input.content,
            verified,
            status: FeedbackStatus::Pending,
            moderation_notes: None,
            moderated_by: None,
            moderated_at: None,
            response: None,
            responded_by: None,
            responded_at: None,
            created_at: now,
            updated_at: now,
        };

        let statement = sea_query::Query::insert()
            .into_table(table::Feedback::Table)
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
                table::Feedback::CreatedAt,
                table::Feedback::UpdatedAt,
            ])
            .values_panic([
                feedback.id.to_owned().into(),
                feedback.user_id.to_owned().into(),
                feedback.author_name.to_owned().into(),
                feedback.kind.to_string().into(),
                feedback.entity_id.to_owned().into(),
                i64::from(feedback.rating).into(),
                feedback.title.to_owned().into(),
                feedback.content.to_owned().into(),
                feedback.verified.into(),
                feedback.status.to_string().into(),
                feedback.created_at.into(),
                feedback.updated_at.into(),
            ])
            .on_conflict(
                OnConflict::columns([
                    table::Feedback::UserId,
                    table::Feedback::Kind,
                    table::Feedback::EntityId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            lectern_shared::user!("You have already reviewed this {kind}");
        }

        tracing::info!(
            feedback_id = %feedback.id,
            %kind,
            entity_id = %feedback.entity_id,
            rating = feedback.rating,
            verified,
            "feedback submitted"
        );

        Ok(feedback)
    }

    pub async fn moderate(
        &self,
        id: impl Into<String>,
        admin: &Session,
        mut input: ModerateInput,
    ) -> lectern_shared::Result<()> {
        input.notes = trimmed(input.notes);
        input.validate()?;

        let id = id.into();
        let now = now_millis();
        let statement = sea_query::Query::update()
            .table(table::Feedback::Table)
            .value(table::Feedback::Status, input.status.to_string())
            .value(table::Feedback::ModerationNotes, input.notes)
            .value(table::Feedback::ModeratedBy, admin.user_id.to_owned())
            .value(table::Feedback::ModeratedAt, now)
            .value(table::Feedback::UpdatedAt, now)
            .and_where(Expr::col(table::Feedback::Id).eq(id.as_str()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            lectern_shared::not_found!("feedback {id}");
        }

        tracing::info!(feedback_id = %id, status = %input.status, admin_id = %admin.user_id, "feedback moderated");

        Ok(())
    }

    /// Sets the staff reply shown under a review. A later reply replaces it.
    pub async fn respond(
        &self,
        id: impl Into<String>,
        admin: &Session,
        mut input: RespondInput,
    ) -> lectern_shared::Result<()> {
        input.response = input.response.trim().to_owned();
        input.validate()?;

        let id = id.into();
        let now = now_millis();
        let statement = sea_query::Query::update()
            .table(table::Feedback::Table)
            .value(table::Feedback::Response, input.response)
            .value(table::Feedback::RespondedBy, admin.user_id.to_owned())
            .value(table::Feedback::RespondedAt, now)
            .value(table::Feedback::UpdatedAt, now)
            .and_where(Expr::col(table::Feedback::Id).eq(id.as_str()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            lectern_shared::not_found!("feedback {id}");
        }

        tracing::info!(feedback_id = %id, admin_id = %admin.user_id, "feedback answered");

        Ok(())
    }
}
