mod date;
mod error;
pub mod kind;
pub mod user;

pub use date::*;
pub use error::*;

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

impl State {
    /// Single pool for both reads and writes, used by the CLI and tests.
    pub fn single(pool: sqlx::SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}
