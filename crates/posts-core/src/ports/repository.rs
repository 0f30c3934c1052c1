use async_trait::async_trait;

use crate::domain::{BlogPost, BlogPostComment};
use crate::error::RepoError;
use crate::filter::PostFilter;
use crate::pagination::{PageRequest, PaginatedItems};

/// Blog post repository - the only way into post storage.
///
/// Every mutation is committed before the returned future resolves and is
/// atomic for the post it targets. Missing entities on lookups are
/// `Ok(None)`; missing entities on mutations are [`RepoError::NotFound`].
#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    /// All stored posts, in no particular order.
    async fn list_all(&self) -> Result<Vec<BlogPost>, RepoError>;

    /// One page of posts ordered by descending id.
    ///
    /// The filter is applied before counting and slicing, and the count and
    /// the slice are read from the same snapshot. `next_page` is left for the
    /// caller to fill in.
    async fn list_paged(
        &self,
        page: PageRequest,
        filter: Option<&PostFilter>,
    ) -> Result<PaginatedItems<BlogPost>, RepoError>;

    /// Find a post, with its comments, by id.
    async fn get(&self, id: i64) -> Result<Option<BlogPost>, RepoError>;

    /// Store a new post, assigning an id if it has none.
    async fn add(&self, post: BlogPost) -> Result<BlogPost, RepoError>;

    /// Persist a new title and description for `post.id`.
    ///
    /// `post.version` is the version the edit was based on. Comments are
    /// never touched. Returns the stored post with its new version.
    async fn update(&self, post: &BlogPost) -> Result<BlogPost, RepoError>;

    /// Delete a post and its comments.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;

    async fn list_comments(&self, post_id: i64) -> Result<Vec<BlogPostComment>, RepoError>;

    async fn get_comment(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<BlogPostComment>, RepoError>;

    /// Append a comment to an existing post. The comment gets a fresh id.
    async fn add_comment(
        &self,
        post_id: i64,
        comment: BlogPostComment,
    ) -> Result<BlogPostComment, RepoError>;

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<(), RepoError>;
}
