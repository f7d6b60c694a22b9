//! Database models and queries

pub mod entry;
pub mod init;
pub mod models;
pub mod store;

pub use entry::*;
pub use init::*;
pub use models::*;
pub use store::{EntityStore, SqliteEntityStore};
