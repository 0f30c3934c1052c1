//! In-memory repository - used when no database is configured.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use posts_core::domain::{BlogPost, BlogPostComment};
use posts_core::error::RepoError;
use posts_core::pagination::paginate;
use posts_core::ports::BlogPostRepository;
use posts_core::{ConflictDetector, PageRequest, PaginatedItems, PostFilter};

struct StoredPost {
    post: BlogPost,
    last_comment_id: i64,
}

fn next_id(last: i64, entity: &str) -> Result<i64, RepoError> {
    last.checked_add(1)
        .ok_or_else(|| RepoError::Constraint(format!("{} id space exhausted", entity)))
}

#[derive(Default)]
struct Store {
    posts: BTreeMap<i64, StoredPost>,
    last_id: i64,
}

/// In-memory blog post repository using a map behind an async RwLock.
///
/// Clones share the same store, so one instance can be handed to every
/// consumer in the process. Mutations hold the write lock for their whole
/// duration, which makes them atomic per post.
/// Note: Data is lost on process restart.
#[derive(Clone)]
pub struct InMemoryBlogPostRepository {
    store: Arc<RwLock<Store>>,
    detector: ConflictDetector,
}

impl InMemoryBlogPostRepository {
    pub fn new(detector: ConflictDetector) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            detector,
        }
    }
}

impl Default for InMemoryBlogPostRepository {
    fn default() -> Self {
        Self::new(ConflictDetector::default())
    }
}

#[async_trait]
impl BlogPostRepository for InMemoryBlogPostRepository {
    async fn list_all(&self) -> Result<Vec<BlogPost>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.values().map(|s| s.post.clone()).collect())
    }

    async fn list_paged(
        &self,
        page: PageRequest,
        filter: Option<&PostFilter>,
    ) -> Result<PaginatedItems<BlogPost>, RepoError> {
        // One read lock for both the count and the slice.
        let store = self.store.read().await;

        let matching = store
            .posts
            .values()
            .map(|s| &s.post)
            .filter(|post| filter.is_none_or(|f| f.matches(post)));

        Ok(paginate(matching, page, |post| post.id).map(BlogPost::clone))
    }

    async fn get(&self, id: i64) -> Result<Option<BlogPost>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.get(&id).map(|s| s.post.clone()))
    }

    async fn add(&self, mut post: BlogPost) -> Result<BlogPost, RepoError> {
        let mut store = self.store.write().await;

        if post.is_transient() {
            post.id = next_id(store.last_id, "BlogPost")?;
        } else if store.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!(
                "BlogPost with id {} already exists",
                post.id
            )));
        }

        let mut last_comment_id = 0;
        for comment in post.comments.iter_mut() {
            last_comment_id = next_id(last_comment_id, "BlogPostComment")?;
            comment.id = last_comment_id;
        }
        post.version = BlogPost::INITIAL_VERSION;
        store.last_id = store.last_id.max(post.id);

        store.posts.insert(
            post.id,
            StoredPost {
                post: post.clone(),
                last_comment_id,
            },
        );

        tracing::debug!(post_id = post.id, "Post stored in memory");
        Ok(post)
    }

    async fn update(&self, post: &BlogPost) -> Result<BlogPost, RepoError> {
        let mut store = self.store.write().await;

        let stored = store
            .posts
            .get_mut(&post.id)
            .ok_or_else(|| RepoError::post_not_found(post.id))?;

        self.detector
            .verify(post.id, post.version, stored.post.version)?;

        stored
            .post
            .apply_edit(post.title.clone(), post.description.clone());
        stored.post.version = stored.post.version.wrapping_add(1);

        tracing::debug!(
            post_id = post.id,
            version = stored.post.version,
            "Post updated in memory"
        );
        Ok(stored.post.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::post_not_found(id))
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<BlogPostComment>, RepoError> {
        let store = self.store.read().await;
        store
            .posts
            .get(&post_id)
            .map(|s| s.post.comments.clone())
            .ok_or_else(|| RepoError::post_not_found(post_id))
    }

    async fn get_comment(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<BlogPostComment>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.get(&post_id).and_then(|s| {
            s.post
                .comments
                .iter()
                .find(|c| c.id == comment_id)
                .cloned()
        }))
    }

    async fn add_comment(
        &self,
        post_id: i64,
        mut comment: BlogPostComment,
    ) -> Result<BlogPostComment, RepoError> {
        let mut store = self.store.write().await;

        let stored = store
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| RepoError::post_not_found(post_id))?;

        comment.id = next_id(stored.last_comment_id, "BlogPostComment")?;
        stored.last_comment_id = comment.id;
        stored.post.comments.push(comment.clone());

        Ok(comment)
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<(), RepoError> {
        let mut store = self.store.write().await;

        let stored = store
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| RepoError::post_not_found(post_id))?;

        let position = stored
            .post
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or_else(|| RepoError::comment_not_found(comment_id))?;
        stored.post.comments.remove(position);

        Ok(())
    }
}
