use std::ops::Deref;

use lectern_db::table::{Course, Webinar};
use lectern_shared::kind::EntityKind;
use sea_query::{Expr, ExprTrait, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::{EntitySummary, types};

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

impl Deref for Query {
    type Target = sqlx::SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn summary_statement(kind: EntityKind) -> SelectStatement {
    match kind {
        EntityKind::Course => sea_query::Query::select()
            .columns([
                Course::Id,
                Course::Title,
                Course::PriceCents,
                Course::CreatedAt,
                Course::ArchivedAt,
            ])
            .from(Course::Table)
            .order_by(Course::CreatedAt, Order::Desc)
            .order_by(Course::Id, Order::Desc)
            .to_owned(),
        EntityKind::Webinar => sea_query::Query::select()
            .columns([
                Webinar::Id,
                Webinar::Title,
                Webinar::PriceCents,
                Webinar::CreatedAt,
                Webinar::ArchivedAt,
            ])
            .from(Webinar::Table)
            .order_by(Webinar::CreatedAt, Order::Desc)
            .order_by(Webinar::Id, Order::Desc)
            .to_owned(),
    }
}

impl Query {
    /// Entities of `kind`, most recently created first, ties broken by id.
    pub async fn list(
        &self,
        kind: EntityKind,
        include_archived: bool,
    ) -> lectern_shared::Result<Vec<EntitySummary>> {
        let mut statement = summary_statement(kind);
        if !include_archived {
            match kind {
                EntityKind::Course => statement.and_where(Expr::col(Course::ArchivedAt).is_null()),
                EntityKind::Webinar => {
                    statement.and_where(Expr::col(Webinar::ArchivedAt).is_null())
                }
            };
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, EntitySummary, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn list_courses(&self) -> lectern_shared::Result<Vec<types::Course>> {
        let statement = sea_query::Query::select()
            .columns([
                Course::Id,
                Course::Title,
                Course::Description,
                Course::Duration,
                Course::PriceCents,
                Course::Modules,
                Course::CreatedAt,
                Course::UpdatedAt,
                Course::ArchivedAt,
            ])
            .from(Course::Table)
            .and_where(Expr::col(Course::ArchivedAt).is_null())
            .order_by(Course::CreatedAt, Order::Desc)
            .order_by(Course::Id, Order::Desc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, types::Course, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn list_webinars(&self) -> lectern_shared::Result<Vec<types::Webinar>> {
        let statement = sea_query::Query::select()
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
                Webinar::ArchivedAt,
            ])
            .from(Webinar::Table)
            .and_where(Expr::col(Webinar::ArchivedAt).is_null())
            .order_by(Webinar::CreatedAt, Order::Desc)
            .order_by(Webinar::Id, Order::Desc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, types::Webinar, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    /// Archived courses are still returned so that past buyers can see them.
    pub async fn find_course(
        &self,
        id: impl Into<String>,
    ) -> lectern_shared::Result<Option<types::Course>> {
        let statement = sea_query::Query::select()
            .columns([
                Course::Id,
                Course::Title,
                Course::Description,
                Course::Duration,
                Course::PriceCents,
                Course::Modules,
                Course::CreatedAt,
                Course::UpdatedAt,
                Course::ArchivedAt,
            ])
            .from(Course::Table)
            .and_where(Expr::col(Course::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, types::Course, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    pub async fn find_webinar(
        &self,
        id: impl Into<String>,
    ) -> lectern_shared::Result<Option<types::Webinar>> {
        let statement = sea_query::Query::select()
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
                Webinar::ArchivedAt,
            ])
            .from(Webinar::Table)
            .and_where(Expr::col(Webinar::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, types::Webinar, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    pub async fn exists(
        &self,
        kind: EntityKind,
        id: &str,
        include_archived: bool,
    ) -> lectern_shared::Result<bool> {
        let mut statement = match kind {
            EntityKind::Course => sea_query::Query::select()
                .column(Course::Id)
                .from(Course::Table)
                .and_where(Expr::col(Course::Id).eq(id))
                .to_owned(),
            EntityKind::Webinar => sea_query::Query::select()
                .column(Webinar::Id)
                .from(Webinar::Table)
                .and_where(Expr::col(Webinar::Id).eq(id))
                .to_owned(),
        };

        if !include_archived {
            match kind {
                EntityKind::Course => statement.and_where(Expr::col(Course::ArchivedAt).is_null()),
                EntityKind::Webinar => {
                    statement.and_where(Expr::col(Webinar::ArchivedAt).is_null())
                }
            };
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(row.is_some())
    }
}
