//! Storage infrastructure - backend selection, connection pooling and migrations

mod factory;
pub mod migrations;
mod postgres;

pub use factory::StorageType;
pub use migrations::{run_storage_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::PostgresConfig;
