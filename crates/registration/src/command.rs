use std::ops::Deref;

use lectern_db::table::Registration;
use lectern_shared::{State, kind::EntityKind, now_millis};
use sea_query::{Expr, ExprTrait, InsertStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use ulid::Generator;
use validator::Validate;

use crate::{ImportInput, RawTimestamp, RegistrationEvent};

#[derive(Clone)]
pub struct Command(pub State);

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

const COLUMNS: [Registration; 6] = [
    Registration::Id,
    Registration::Kind,
    Registration::EntityId,
    Registration::UserId,
    Registration::CreatedAt,
    Registration::RecordedAt,
];

fn row_values(event: &RegistrationEvent) -> lectern_shared::Result<Vec<Expr>> {
    let created_at = event
        .created_at
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    Ok(vec![
        Expr::val(event.id.to_owned()),
        Expr::val(event.kind.to_string()),
        Expr::val(event.entity_id.to_owned()),
        Expr::val(event.user_id.to_owned()),
        Expr::val(created_at),
        Expr::val(event.recorded_at),
    ])
}

fn insert_statement(event: &RegistrationEvent) -> lectern_shared::Result<InsertStatement> {
    Ok(sea_query::Query::insert()
        .into_table(Registration::Table)
        .columns(COLUMNS)
        .values_panic(row_values(event)?)
        .to_owned())
}

/// Inserts `event` only when its user holds no registration for the same
/// entity. Check and write happen in one statement.
fn insert_once_statement(event: &RegistrationEvent) -> lectern_shared::Result<InsertStatement> {
    let existing = sea_query::Query::select()
        .expr(Expr::val(1))
        .from(Registration::Table)
        .and_where(Expr::col(Registration::UserId).eq(event.user_id.to_owned()))
        .and_where(Expr::col(Registration::Kind).eq(event.kind.to_string()))
        .and_where(Expr::col(Registration::EntityId).eq(event.entity_id.to_owned()))
        .to_owned();

    let row = sea_query::Query::select()
        .exprs(row_values(event)?)
        .and_where(Expr::exists(existing).not())
        .to_owned();

    let mut statement = sea_query::Query::insert();
    statement
        .into_table(Registration::Table)
        .columns(COLUMNS)
        .select_from(row)
        .map_err(|e| lectern_shared::Error::Server(e.to_string()))?;

    Ok(statement)
}

impl Command {
    /// Records a seat for `user_id`. The entity must exist and be listed, and
    /// a user registers at most once per entity.
    pub async fn book(
        &self,
        user_id: impl Into<String>,
        kind: EntityKind,
        entity_id: impl Into<String>,
    ) -> lectern_shared::Result<RegistrationEvent> {
        let user_id = user_id.into();
        let entity_id = entity_id.into();

        let catalog = lectern_catalog::Query(self.read_db.clone());
        if !catalog.exists(kind, &entity_id, false).await? {
            lectern_shared::not_found!("{kind} {entity_id}");
        }

        let now = now_millis();
        let event = RegistrationEvent {
            id: ulid::Ulid::new().to_string(),
            kind,
            entity_id: Some(entity_id),
            user_id: Some(user_id),
            created_at: Some(RawTimestamp::Millis(now)),
            recorded_at: now,
        };

        let (sql, values) = insert_once_statement(&event)?.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            lectern_shared::user!("Already registered for this {kind}");
        }

        tracing::info!(
            registration_id = %event.id,
            %kind,
            entity_id = ?event.entity_id,
            "seat booked"
        );

        Ok(event)
    }

    /// Appends client supplied records verbatim, in one transaction.
    /// Timestamps are kept raw and only read when aggregating.
    pub async fn import(&self, input: ImportInput) -> lectern_shared::Result<usize> {
        input.validate()?;

        let recorded_at = now_millis();
        let mut generator = Generator::new();
        let mut tx = self.write_db.begin().await?;

        for record in &input.records {
            let id = generator
                .generate()
                .map_err(|e| lectern_shared::Error::Server(e.to_string()))?;

            let event = RegistrationEvent {
                id: id.to_string(),
                kind: record.kind,
                entity_id: record.entity_id.to_owned(),
                user_id: record.user_id.to_owned(),
                created_at: record.created_at.to_owned(),
                recorded_at,
            };

            let (sql, values) = insert_statement(&event)?.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::info!(count = input.records.len(), "registrations imported");

        Ok(input.records.len())
    }
}
