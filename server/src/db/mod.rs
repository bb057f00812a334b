//! Database module for PostgreSQL persistence.

mod pool;
mod store;

pub use pool::*;
pub use store::*;
