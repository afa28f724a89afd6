use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Course;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Course::Table)
        .col(
            ColumnDef::new(Course::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Course::Title)
                .string()
                .not_null()
                .string_len(200),
        )
        .col(
            ColumnDef::new(Course::Description)
                .text()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Course::Duration)
                .string()
                .not_null()
                .string_len(50)
                .default(""),
        )
        .col(
            ColumnDef::new(Course::PriceCents)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Course::Modules).text().not_null())
        .col(ColumnDef::new(Course::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Course::UpdatedAt).big_integer().not_null())
        .col(ColumnDef::new(Course::ArchivedAt).big_integer().null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Course::Table).to_owned()
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
        .name("idx_course_created_at")
        .table(Course::Table)
        .col(Course::CreatedAt)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_course_created_at")
        .table(Course::Table)
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
