use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::QuestionReply;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(QuestionReply::Table)
        .col(
            ColumnDef::new(QuestionReply::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(QuestionReply::QuestionId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(QuestionReply::AdminId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(QuestionReply::AdminName)
                .string()
                .not_null()
                .string_len(320),
        )
        .col(ColumnDef::new(QuestionReply::Body).text().not_null())
        .col(
            ColumnDef::new(QuestionReply::Kind)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(QuestionReply::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(QuestionReply::Table).to_owned()
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
        .name("idx_question_reply_question_id")
        .table(QuestionReply::Table)
        .col(QuestionReply::QuestionId)
        .col(QuestionReply::CreatedAt)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_question_reply_question_id")
        .table(QuestionReply::Table)
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
