//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use posts_core::PageRequest;

use crate::state::{AppState, StorageBackend};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: StorageBackend,
    /// Stored posts, absent when storage could not be queried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_posts: Option<u64>,
    pub checked_at: String,
}

/// GET /api/health
///
/// Counts posts through the repository, so a broken storage backend turns
/// the answer into `503 degraded`.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let probe = match PageRequest::new(0, 1) {
        Ok(page) => state.posts.list_paged(page, None).await.ok(),
        Err(_) => None,
    };
    let total_posts = probe.map(|page| page.total_items);

    let response = HealthResponse {
        status: if total_posts.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage,
        total_posts,
        checked_at: chrono::Utc::now().to_rfc3339(),
    };

    if total_posts.is_some() {
        HttpResponse::Ok().json(response)
    } else {
        tracing::warn!(storage = ?state.storage, "Health check could not reach storage");
        HttpResponse::ServiceUnavailable().json(response)
    }
}
