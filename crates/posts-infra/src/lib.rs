//! # Posts Infrastructure
//!
//! Concrete implementations of the ports defined in `posts-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL storage via SeaORM
//! - `minimal` - No external dependencies, in-memory storage only

pub mod database;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryBlogPostRepository};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::PostgresBlogPostRepository;
