use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Question;

pub struct CreateTable;

// kind and entity_id are set together when the question is about a catalog item.
fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Question::Table)
        .col(
            ColumnDef::new(Question::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Question::UserId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Question::AuthorName)
                .string()
                .not_null()
                .string_len(320),
        )
        .col(
            ColumnDef::new(Question::Title)
                .string()
                .not_null()
                .string_len(200),
        )
        .col(ColumnDef::new(Question::Content).text().not_null())
        .col(ColumnDef::new(Question::Kind).string().null().string_len(15))
        .col(
            ColumnDef::new(Question::EntityId)
                .string()
                .null()
                .string_len(64),
        )
        .col(
            ColumnDef::new(Question::Status)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(ColumnDef::new(Question::ResolutionNotes).text().null())
        .col(ColumnDef::new(Question::FirstResponseAt).big_integer().null())
        .col(ColumnDef::new(Question::ResolvedAt).big_integer().null())
        .col(ColumnDef::new(Question::ClosedAt).big_integer().null())
        .col(ColumnDef::new(Question::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Question::UpdatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Question::Table).to_owned()
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
        .name("idx_question_user_id")
        .table(Question::Table)
        .col(Question::UserId)
        .col(Question::CreatedAt)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_question_user_id")
        .table(Question::Table)
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

pub struct CreateIdx2;

fn create_idx_2() -> IndexCreateStatement {
    Index::create()
        .name("idx_question_status")
        .table(Question::Table)
        .col(Question::Status)
        .col(Question::CreatedAt)
        .to_owned()
}

fn drop_idx_2() -> IndexDropStatement {
    Index::drop()
        .name("idx_question_status")
        .table(Question::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx2 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_2().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_2().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
