pub mod connection;
pub mod list_repo;
pub mod migrations;
pub mod snapshot_repo;

pub use connection::*;
pub use snapshot_repo::SqliteStorage;
