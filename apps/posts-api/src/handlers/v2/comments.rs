use actix_web::{HttpRequest, HttpResponse, http::header, web};
use validator::Validate;

use posts_core::RepoError;
use posts_core::domain::BlogPostComment;
use posts_shared::dto::CommentRequest;

use crate::handlers::location;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Log and convert a missing-parent outcome the way the post handlers do.
fn map_missing(post_id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |err| {
        if let RepoError::NotFound { .. } = err {
            tracing::warn!("Post {} not found", post_id);
        }
        AppError::from(err)
    }
}

/// GET /api/v2/blogposts/{id}/comments
pub async fn list(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    tracing::info!("Retrieving comments for post {}", post_id);

    let comments = state
        .posts
        .list_comments(post_id)
        .await
        .map_err(map_missing(post_id))?;

    tracing::info!("Comments for post {} retrieved successfully", post_id);
    Ok(HttpResponse::Ok().json(comments))
}

/// GET /api/v2/blogposts/{id}/comments/{comment_id}
pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    tracing::info!("Retrieving comment {} of post {}", comment_id, post_id);

    let comment = state
        .posts
        .get_comment(post_id, comment_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Comment {} of post {} not found", comment_id, post_id);
            AppError::NotFound(format!(
                "BlogPostComment with id {} not found on BlogPost {}",
                comment_id, post_id
            ))
        })?;

    Ok(HttpResponse::Ok().json(comment))
}

/// POST /api/v2/blogposts/{id}/comments
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let body = body.into_inner();
    tracing::info!("Creating new comment for post {}", post_id);
    tracing::debug!("Received comment with author: {}", body.author);

    body.validate()?;

    let comment = state
        .posts
        .add_comment(post_id, BlogPostComment::new(body.author, body.content))
        .await
        .map_err(map_missing(post_id))?;
    let url = location(
        &req,
        "v2_blog_post_comment",
        [post_id.to_string(), comment.id.to_string()],
    )?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, url))
        .json(comment))
}

/// DELETE /api/v2/blogposts/{id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    tracing::info!("Deleting comment {} of post {}", comment_id, post_id);

    state
        .posts
        .delete_comment(post_id, comment_id)
        .await
        .map_err(map_missing(post_id))?;

    tracing::info!("Comment {} of post {} deleted successfully", comment_id, post_id);
    Ok(HttpResponse::NoContent().finish())
}
