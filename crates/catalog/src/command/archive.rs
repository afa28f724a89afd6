use lectern_db::table::{Course, Webinar};
use lectern_shared::{kind::EntityKind, now_millis};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder, UpdateStatement};
use sea_query_sqlx::SqlxBinder;

impl super::Command {
    /// Hides the entity from public listings. Archiving twice is a no-op and
    /// the registration history of the entity is kept.
    pub async fn archive(
        &self,
        kind: EntityKind,
        id: impl Into<String>,
    ) -> lectern_shared::Result<()> {
        let id = id.into();
        let now = now_millis();

        let statement: UpdateStatement = match kind {
            EntityKind::Course => Query::update()
                .table(Course::Table)
                .value(Course::ArchivedAt, now)
                .and_where(Expr::col(Course::Id).eq(id.as_str()))
                .and_where(Expr::col(Course::ArchivedAt).is_null())
                .to_owned(),
            EntityKind::Webinar => Query::update()
                .table(Webinar::Table)
                .value(Webinar::ArchivedAt, now)
                .and_where(Expr::col(Webinar::Id).eq(id.as_str()))
                .and_where(Expr::col(Webinar::ArchivedAt).is_null())
                .to_owned(),
        };

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!(%kind, entity_id = %id, "entity archived");
            return Ok(());
        }

        let query = crate::Query(self.write_db.clone());
        if !query.exists(kind, &id, true).await? {
            lectern_shared::not_found!("{kind} {id}");
        }

        Ok(())
    }
}
