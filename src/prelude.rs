pub use crate::appdata::AppData;
pub use crate::config::Config;
pub(crate) use crate::db;
