mod command;
mod gate;
mod repository;
mod session;

pub use command::*;
pub use gate::*;
pub use session::*;
