use std::ops::Deref;

use lectern_shared::State;

mod archive;
mod create;
mod update;

#[derive(Clone)]
pub struct Command(pub State);

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
