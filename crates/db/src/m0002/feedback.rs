use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Feedback;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Feedback::Table)
        .col(
            ColumnDef::new(Feedback::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Feedback::UserId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Feedback::AuthorName)
                .string()
                .not_null()
                .string_len(320),
        )
        .col(
            ColumnDef::new(Feedback::Kind)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(Feedback::EntityId)
                .string()
                .not_null()
                .string_len(64),
        )
        .col(ColumnDef::new(Feedback::Rating).integer().not_null())
        .col(ColumnDef::new(Feedback::Title).string().null().string_len(200))
        .col(ColumnDef::new(Feedback::Content).text().null())
        .col(
            ColumnDef::new(Feedback::Verified)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Feedback::Status)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(ColumnDef::new(Feedback::ModerationNotes).text().null())
        .col(
            ColumnDef::new(Feedback::ModeratedBy)
                .string()
                .null()
                .string_len(26),
        )
        .col(ColumnDef::new(Feedback::ModeratedAt).big_integer().null())
        .col(ColumnDef::new(Feedback::Response).text().null())
        .col(
            ColumnDef::new(Feedback::RespondedBy)
                .string()
                .null()
                .string_len(26),
        )
        .col(ColumnDef::new(Feedback::RespondedAt).big_integer().null())
        .col(ColumnDef::new(Feedback::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Feedback::UpdatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Feedback::Table).to_owned()
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

// One review per user and item.
pub struct CreateUk1;

fn create_uk_1() -> IndexCreateStatement {
    Index::create()
        .name("uk_feedback_user_item")
        .table(Feedback::Table)
        .col(Feedback::UserId)
        .col(Feedback::Kind)
        .col(Feedback::EntityId)
        .unique()
        .to_owned()
}

fn drop_uk_1() -> IndexDropStatement {
    Index::drop()
        .name("uk_feedback_user_item")
        .table(Feedback::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_uk_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_uk_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_feedback_item_status")
        .table(Feedback::Table)
        .col(Feedback::Kind)
        .col(Feedback::EntityId)
        .col(Feedback::Status)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_feedback_item_status")
        .table(Feedback::Table)
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
