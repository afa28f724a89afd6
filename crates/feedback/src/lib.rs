mod command;
mod query;
mod summary;
mod types;

pub use command::*;
pub use query::*;
pub use summary::*;
pub use types::*;
