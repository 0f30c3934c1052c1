//! Optimistic concurrency policy.
//!
//! An update carries the version it was based on. At persist time the stored
//! version must still match, otherwise the update is rejected with
//! [`RepoError::Conflict`]. Storage engines without row versioning run the
//! detector in [`ConcurrencyMode::LastWriterWins`], where every update
//! overwrites title and description unconditionally.

use std::str::FromStr;

use crate::error::RepoError;

/// How concurrent updates to the same post are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Reject writes based on a stale version.
    #[default]
    Optimistic,
    /// Detection disabled; the last write overwrites earlier ones.
    LastWriterWins,
}

impl FromStr for ConcurrencyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" | "enabled" | "on" | "true" => Ok(ConcurrencyMode::Optimistic),
            "disabled" | "off" | "false" | "last-writer-wins" => {
                Ok(ConcurrencyMode::LastWriterWins)
            }
            other => Err(format!("unknown concurrency mode: {}", other)),
        }
    }
}

/// Version check shared by all repository implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector {
    mode: ConcurrencyMode,
}

impl ConflictDetector {
    pub fn new(mode: ConcurrencyMode) -> Self {
        Self { mode }
    }

    pub fn optimistic() -> Self {
        Self::new(ConcurrencyMode::Optimistic)
    }

    pub fn disabled() -> Self {
        Self::new(ConcurrencyMode::LastWriterWins)
    }

    pub fn is_enabled(&self) -> bool {
        self.mode == ConcurrencyMode::Optimistic
    }

    /// Check the version an update was based on against the stored one.
    pub fn verify(&self, id: i64, expected: i64, stored: i64) -> Result<(), RepoError> {
        if self.is_enabled() && expected != stored {
            return Err(RepoError::Conflict {
                entity: "BlogPost",
                id,
                expected,
                actual: stored,
            });
        }
        Ok(())
    }

    /// The version the storage engine must still find when it persists, or
    /// `None` when detection is disabled.
    pub fn expected_version(&self, version: i64) -> Option<i64> {
        self.is_enabled().then_some(version)
    }
}
