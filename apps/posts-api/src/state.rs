//! Application state - shared across all handlers.

use std::sync::Arc;

use serde::Serialize;

use posts_core::ConflictDetector;
use posts_core::ports::BlogPostRepository;
use posts_infra::InMemoryBlogPostRepository;

#[cfg(feature = "postgres")]
use posts_infra::PostgresBlogPostRepository;

use crate::config::AppConfig;

/// Which engine backs the post repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn BlogPostRepository>,
    pub storage: StorageBackend,
    pub default_page_size: u64,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let detector = ConflictDetector::new(config.concurrency);
        let in_memory = || -> (Arc<dyn BlogPostRepository>, StorageBackend) {
            (
                Arc::new(InMemoryBlogPostRepository::new(detector)),
                StorageBackend::Memory,
            )
        };

        #[cfg(feature = "postgres")]
        let (posts, storage) = match &config.database {
            Some(db_config) => match posts_infra::database::connect(db_config).await {
                Ok(conn) => (
                    Arc::new(PostgresBlogPostRepository::new(conn, detector))
                        as Arc<dyn BlogPostRepository>,
                    StorageBackend::Postgres,
                ),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (posts, storage) = {
            tracing::info!("Running without postgres feature - using in-memory repository");
            in_memory()
        };

        tracing::info!(?storage, "Application state initialized");

        Self::with_repository(posts, storage, config.default_page_size)
    }

    pub fn with_repository(
        posts: Arc<dyn BlogPostRepository>,
        storage: StorageBackend,
        default_page_size: u64,
    ) -> Self {
        Self {
            posts,
            storage,
            default_page_size,
        }
    }
}
