mod executor;
mod helper;

pub mod models;
pub mod schema;

pub use executor::{Executor, JobQuery, TrashedFilter};
pub use helper::{Error, Helper};
