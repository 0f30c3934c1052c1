//! v1 blog post endpoints - plain CRUD without paging or comments.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use validator::Validate;

use posts_core::RepoError;
use posts_core::domain::BlogPost;
use posts_shared::dto::{BlogPostRequest, BlogPostSummary};

use super::location;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// v1 has no conflict outcome; a replace that keeps losing races is retried
/// this many times before failing.
const REPLACE_ATTEMPTS: usize = 3;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1/blogposts")
            .service(
                web::resource("")
                    .route(web::get().to(list))
                    .route(web::post().to(create)),
            )
            .service(
                web::resource("/{id}")
                    .name("v1_blog_post")
                    .route(web::get().to(get))
                    .route(web::put().to(replace))
                    .route(web::delete().to(delete)),
            ),
    );
}

fn summary(post: BlogPost) -> BlogPostSummary {
    BlogPostSummary {
        id: post.id,
        title: post.title,
        description: post.description,
    }
}

fn not_found(id: i64) -> AppError {
    tracing::warn!("Post {} not found", id);
    AppError::NotFound(format!("BlogPost with id {} not found", id))
}

/// GET /api/v1/blogposts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    tracing::info!("Retrieving all posts");

    let posts = state.posts.list_all().await?;
    let body: Vec<BlogPostSummary> = posts.into_iter().map(summary).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/v1/blogposts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    tracing::info!("Retrieving post {}", id);

    let post = state.posts.get(id).await?.ok_or_else(|| not_found(id))?;

    tracing::info!("Post {} retrieved successfully", id);
    Ok(HttpResponse::Ok().json(summary(post)))
}

/// POST /api/v1/blogposts
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
    let url = location(&req, "v1_blog_post", [post.id.to_string()])?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, url))
        .json(summary(post)))
}

/// PUT /api/v1/blogposts/{id}
pub async fn replace(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<BlogPostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let body = body.into_inner();
    tracing::info!("Updating post {}", id);
    tracing::debug!("Received post id {} with new title: {}", id, body.title);

    body.validate()?;

    for attempt in 1..=REPLACE_ATTEMPTS {
        let mut post = state.posts.get(id).await?.ok_or_else(|| not_found(id))?;
        post.apply_edit(body.title.clone(), body.description.clone());

        match state.posts.update(&post).await {
            Ok(_) => {
                tracing::info!("Post {} updated successfully", id);
                return Ok(HttpResponse::NoContent().finish());
            }
            Err(RepoError::Conflict { .. }) => {
                tracing::warn!(attempt, "Post {} changed while updating, retrying", id);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(format!(
        "post {} kept changing during {} update attempts",
        id, REPLACE_ATTEMPTS
    )))
}

/// DELETE /api/v1/blogposts/{id}
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
