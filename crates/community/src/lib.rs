use std::ops::Deref;

use lectern_db::table::CommunityPost;
use lectern_identity::Session;
use lectern_shared::{State, now_millis};
use sea_query::{Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use ulid::Ulid;
use validator::Validate;

/// Upper bound on posts returned by one listing.
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub body: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostInput {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

#[derive(Clone)]
pub struct Command(pub State);

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    /// Appends a post to the feed. The author comes from the session.
    pub async fn create_post(
        &self,
        session: &Session,
        mut input: PostInput,
    ) -> lectern_shared::Result<Post> {
        input.body = input.body.trim().to_owned();
        input.validate()?;

        let post = Post {
            id: Ulid::new().to_string(),
            author_id: session.user_id.to_owned(),
            author_name: session.author_name(),
            body: input.body,
            created_at: now_millis(),
        };

        let statement = sea_query::Query::insert()
            .into_table(CommunityPost::Table)
            .columns([
                CommunityPost::Id,
                CommunityPost::AuthorId,
                CommunityPost::AuthorName,
                CommunityPost::Body,
                CommunityPost::CreatedAt,
            ])
            .values_panic([
                post.id.to_owned().into(),
                post.author_id.to_owned().into(),
                post.author_name.to_owned().into(),
                post.body.to_owned().into(),
                post.created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        tracing::info!(post_id = %post.id, author_id = %post.author_id, "post created");

        Ok(post)
    }
}

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

impl Deref for Query {
    type Target = sqlx::SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Query {
    /// Newest first, at most `limit` posts (capped at [`MAX_LIMIT`]).
    pub async fn list_posts(&self, limit: u64) -> lectern_shared::Result<Vec<Post>> {
        let statement = sea_query::Query::select()
            .columns([
                CommunityPost::Id,
                CommunityPost::AuthorId,
                CommunityPost::AuthorName,
                CommunityPost::Body,
                CommunityPost::CreatedAt,
            ])
            .from(CommunityPost::Table)
            .order_by(CommunityPost::CreatedAt, Order::Desc)
            .order_by(CommunityPost::Id, Order::Desc)
            .limit(limit.clamp(1, MAX_LIMIT))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Post, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }
}
