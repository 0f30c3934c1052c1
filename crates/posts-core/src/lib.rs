//! # Posts Core
//!
//! The domain layer of the posts service.
//! This crate contains the entity model, the repository port and the
//! pagination and concurrency rules every storage engine has to honor.
//! It has zero infrastructure dependencies.

pub mod conflict;
pub mod domain;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod ports;

pub use conflict::{ConcurrencyMode, ConflictDetector};
pub use error::{DomainError, RepoError};
pub use filter::PostFilter;
pub use pagination::{PageRequest, PaginatedItems};
