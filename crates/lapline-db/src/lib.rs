pub mod config;
pub mod database;
pub mod loader;

pub use config::DatabaseConfig;
pub use database::Database;
pub use loader::PgBulkLoader;
