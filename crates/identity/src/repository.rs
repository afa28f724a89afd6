use lectern_db::table::User;
use lectern_shared::{now_millis, user::Role};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password: String,
    pub role: sqlx::types::Text<Role>,
}

pub enum FindType {
    Id(String),
    Email(String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> lectern_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([
            User::Id,
            User::Email,
            User::DisplayName,
            User::Password,
            User::Role,
        ])
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Email(email) => statement.and_where(Expr::col(User::Email).eq(email)),
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) struct CreateInput {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password: String,
    pub role: Role,
}

pub(crate) async fn create(pool: &SqlitePool, input: CreateInput) -> lectern_shared::Result<()> {
    let statement = Query::insert()
        .into_table(User::Table)
        .columns([
            User::Id,
            User::Email,
            User::DisplayName,
            User::Password,
            User::Role,
            User::CreatedAt,
        ])
        .values_panic([
            input.id.into(),
            input.email.into(),
            input.display_name.into(),
            input.password.into(),
            input.role.to_string().into(),
            now_millis().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub(crate) async fn update_role(
    pool: &SqlitePool,
    id: impl Into<String>,
    role: Role,
) -> lectern_shared::Result<()> {
    let statement = Query::update()
        .table(User::Table)
        .value(User::Role, role.as_ref())
        .and_where(Expr::col(User::Id).eq(id.into()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}
