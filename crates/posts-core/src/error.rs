//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business rule failures raised before storage is touched.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Repository-level errors.
///
/// `NotFound` and `Conflict` are expected outcomes that callers translate for
/// their clients. `Connection` and `Query` are storage failures and are not
/// recoverable at this layer.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} with id {id} was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        entity: &'static str,
        id: i64,
        expected: i64,
        actual: i64,
    },

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepoError {
    pub fn post_not_found(id: i64) -> Self {
        RepoError::NotFound {
            entity: "BlogPost",
            id,
        }
    }

    pub fn comment_not_found(id: i64) -> Self {
        RepoError::NotFound {
            entity: "BlogPostComment",
            id,
        }
    }
}
