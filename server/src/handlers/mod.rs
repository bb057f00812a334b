//! Request handlers for record creation and updates.

mod create;
mod update;

pub use create::*;
pub use update::*;
