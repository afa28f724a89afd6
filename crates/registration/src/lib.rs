mod aggregator;
mod command;
mod event;
mod presenter;
mod query;
mod source;
mod timestamp;

pub use aggregator::*;
pub use command::*;
pub use event::*;
pub use presenter::*;
pub use query::*;
pub use source::*;
pub use timestamp::*;
