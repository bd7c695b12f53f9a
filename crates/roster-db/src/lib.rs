//! # roster-db
//!
//! Database layer implementing repository traits with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides SQLite implementations for all repository traits
//! defined in `roster-core`. It handles:
//!
//! - Connection pool management and the embedded schema
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roster_db::{create_pool, PoolConfig, SqliteMemberRepository};
//! use roster_core::traits::MemberRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("sqlite://roster.db?mode=rwc")).await?;
//!     let members = SqliteMemberRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{create_memory_pool, create_pool, PoolConfig, SqlitePool};
pub use repositories::{
    SqliteBirthdayRepository, SqliteMemberRepository, SqliteRoleRepository,
    SqliteSettingRepository,
};
