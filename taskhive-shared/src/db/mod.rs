/// Database connectivity and schema management
pub mod migrations;
pub mod pool;

pub use migrations::{ensure_database_exists, run_migrations};
pub use pool::{create_pool, DatabaseConfig};
