use lectern_db::table::{Course, Webinar};
use lectern_shared::now_millis;
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use ulid::Ulid;
use validator::Validate;

use crate::{CourseInput, WebinarInput};

impl super::Command {
    pub async fn create_course(&self, input: CourseInput) -> lectern_shared::Result<String> {
        input.validate()?;

        let id = Ulid::new().to_string();
        let now = now_millis();
        let modules = serde_json::to_string(&input.modules)?;

        let statement = Query::insert()
            .into_table(Course::Table)
            .columns([
                Course::Id,
                Course::Title,
                Course::Description,
                Course::Duration,
                Course::PriceCents,
                Course::Modules,
                Course::CreatedAt,
                Course::UpdatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.title.trim().to_owned().into(),
                input.description.into(),
                input.duration.into(),
                input.price_cents.into(),
                modules.into(),
                now.into(),
                now.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        tracing::info!(course_id = %id, "course created");

        Ok(id)
    }

    pub async fn create_webinar(&self, input: WebinarInput) -> lectern_shared::Result<String> {
        input.validate()?;

        let id = Ulid::new().to_string();
        let now = now_millis();

        let statement = Query::insert()
            .into_table(Webinar::Table)
            .columns([
                Webinar::Id,
                Webinar::Title,
                Webinar::Description,
                Webinar::Duration,
                Webinar::PriceCents,
                Webinar::Platform,
                Webinar::StartsAt,
                Webinar::CreatedAt,
                Webinar::UpdatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.title.trim().to_owned().into(),
                input.description.into(),
                input.duration.into(),
                input.price_cents.into(),
                input.platform.into(),
                input.starts_at.into(),
                now.into(),
                now.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        tracing::info!(webinar_id = %id, "webinar created");

        Ok(id)
    }
}
