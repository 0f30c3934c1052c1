use actix_web::{HttpRequest, HttpResponse, http::header, web};
use validator::Validate;

use posts_core::domain::BlogPost;
use posts_core::{PostFilter, RepoError};
use posts_shared::dto::{BlogPostRequest, PageQuery};

use super::paging::{ListMode, page_request, with_next_link};
use crate::handlers::location;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    tracing::warn!("Post {} not found", id);
    AppError::NotFound(format!("BlogPost with id {} not found", id))
}

fn etag(version: i64) -> (header::HeaderName, String) {
    (header::ETAG, format!("\"{}\"", version))
}

/// Version the client based its edit on, taken from `If-Match`.
/// `*` or no header means "whatever is stored now".
fn if_match_version(req: &HttpRequest) -> AppResult<Option<i64>> {
    let Some(value) = req.headers().get(header::IF_MATCH) else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::BadRequest("If-Match is not valid ASCII".to_string()))?
        .trim();
    if raw == "*" {
        return Ok(None);
    }

    raw.trim_start_matches("W/")
        .trim_matches('"')
        .parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("If-Match {} is not a post version", raw)))
}

/// GET /api/v2/blogposts[?pageIndex=3&pageSize=10]
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    tracing::info!("Retrieving all posts");

    match ListMode::from_query(&query, state.default_page_size)? {
        ListMode::All => {
            let posts = state.posts.list_all().await?;
            Ok(HttpResponse::Ok().json(posts))
        }
        ListMode::Page(page) => {
            let posts = state.posts.list_paged(page, None).await?;
            Ok(HttpResponse::Ok().json(with_next_link(&req, posts)))
        }
    }
}

/// GET /api/v2/blogposts/withtitle/{title}[?pageIndex=0&pageSize=5]
pub async fn with_title(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let title = path.into_inner();
    tracing::info!("Retrieving all posts with title {}", title);

    let page = page_request(
        query.page_index.unwrap_or(0),
        query.page_size,
        state.default_page_size,
    )?;
    let filter = PostFilter::title_contains(title);
    let posts = state.posts.list_paged(page, Some(&filter)).await?;

    Ok(HttpResponse::Ok().json(with_next_link(&req, posts)))
}

/// GET /api/v2/blogposts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    tracing::info!("Retrieving post {}", id);

    let post = state.posts.get(id).await?.ok_or_else(|| not_found(id))?;

    tracing::info!("Post {} retrieved successfully", id);
    Ok(HttpResponse::Ok()
        .insert_header(etag(post.version))
        .json(post))
}

/// POST /api/v2/blogposts
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<BlogPostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    tracing::info!("Creating new post");
    tracing::debug!("Received post with title: {}", body.title);

    body.validate()?;

    let post = state
        .posts
        .add(BlogPost::new(body.title, body.description))
        .await?;
    let url = location(&req, "v2_blog_post", [post.id.to_string()])?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, url))
        .insert_header(etag(post.version))
        .json(post))
}

/// PUT /api/v2/blogposts/{id}
///
/// Returns 409 when the post changed since the version the edit is based on:
/// the one sent in `If-Match`, or the one read here.
pub async fn replace(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<BlogPostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let body = body.into_inner();
    tracing::info!("Updating post {}", id);
    tracing::debug!("Received post id {} with new title: {}", id, body.title);

    body.validate()?;
    let expected_version = if_match_version(&req)?;

    let mut post = state.posts.get(id).await?.ok_or_else(|| not_found(id))?;
    if let Some(version) = expected_version {
        post.version = version;
    }
    post.apply_edit(body.title, body.description);

    let updated = state.posts.update(&post).await.map_err(|e| {
        if let RepoError::Conflict { .. } = e {
            tracing::warn!("Post {} was modified concurrently", id);
        }
        AppError::from(e)
    })?;

    tracing::info!("Post {} updated successfully", id);
    Ok(HttpResponse::NoContent()
        .insert_header(etag(updated.version))
        .finish())
}

/// DELETE /api/v2/blogposts/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    tracing::info!("Deleting post {}", id);

    match state.posts.delete(id).await {
        Ok(()) => {
            tracing::info!("Post {} deleted successfully", id);
            Ok(HttpResponse::NoContent().finish())
        }
        Err(RepoError::NotFound { .. }) => Err(not_found(id)),
        Err(e) => Err(e.into()),
    }
}
