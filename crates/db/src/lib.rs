use sqlx_migrator::{Info, Migrator};

mod m0001;
mod m0002;
pub mod table;

pub fn migrator() -> Result<Migrator<sqlx::Sqlite>, sqlx_migrator::Error> {
    let mut migrator = Migrator::default();
    migrator.add_migrations(vec![Box::new(m0001::Migration), Box::new(m0002::Migration)])?;

    Ok(migrator)
}
