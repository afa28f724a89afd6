use lectern_db::table::{Course, Webinar};
use lectern_shared::now_millis;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use validator::Validate;

use crate::{CourseInput, WebinarInput};

impl super::Command {
    /// Replaces every editable field. Concurrent edits resolve last-writer-wins.
    pub async fn update_course(
        &self,
        id: impl Into<String>,
        input: CourseInput,
    ) -> lectern_shared::Result<()> {
        input.validate()?;

        let id = id.into();
        let modules = serde_json::to_string(&input.modules)?;

        let statement = Query::update()
            .table(Course::Table)
            .values([
                (Course::Title, input.title.trim().to_owned().into()),
                (Course::Description, input.description.into()),
                (Course::Duration, input.duration.into()),
                (Course::PriceCents, input.price_cents.into()),
                (Course::Modules, modules.into()),
                (Course::UpdatedAt, now_millis().into()),
            ])
            .and_where(Expr::col(Course::Id).eq(id.as_str()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            lectern_shared::not_found!("course {id}");
        }

        Ok(())
    }

    pub async fn update_webinar(
        &self,
        id: impl Into<String>,
        input: WebinarInput,
    ) -> lectern_shared::Result<()> {
        input.validate()?;

        let id = id.into();

        let statement = Query::update()
            .table(Webinar::Table)
            .values([
                (Webinar::Title, input.title.trim().to_owned().into()),
                (Webinar::Description, input.description.into()),
                (Webinar::Duration, input.duration.into()),
                (Webinar::PriceCents, input.price_cents.into()),
                (Webinar::Platform, input.platform.into()),
                (Webinar::StartsAt, input.starts_at.into()),
                (Webinar::UpdatedAt, now_millis().into()),
            ])
            .and_where(Expr::col(Webinar::Id).eq(id.as_str()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            lectern_shared::not_found!("webinar {id}");
        }

        Ok(())
    }
}
