use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Webinar;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Webinar::Table)
        .col(
            ColumnDef::new(Webinar::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Webinar::Title)
                .string()
                .not_null()
                .string_len(200),
        )
        .col(
            ColumnDef::new(Webinar::Description)
                .text()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Webinar::Duration)
                .string()
                .not_null()
                .string_len(50)
                .default(""),
        )
        .col(
            ColumnDef::new(Webinar::PriceCents)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Webinar::Platform)
                .string()
                .not_null()
                .string_len(50),
        )
        .col(ColumnDef::new(Webinar::StartsAt).big_integer().null())
        .col(ColumnDef::new(Webinar::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Webinar::UpdatedAt).big_integer().not_null())
        .col(ColumnDef::new(Webinar::ArchivedAt).big_integer().null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Webinar::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_webinar_created_at")
        .table(Webinar::Table)
        .col(Webinar::CreatedAt)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_webinar_created_at")
        .table(Webinar::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
