//! Database connection pool management

mod sqlite;

pub use sqlite::{create_memory_pool, create_pool, PoolConfig};

// Re-export SqlitePool for convenience
pub use sqlx::sqlite::SqlitePool;
