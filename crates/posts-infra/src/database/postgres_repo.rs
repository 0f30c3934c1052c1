//! PostgreSQL repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait,
    IsolationLevel, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    Statement, TransactionTrait,
};

use posts_core::domain::{BlogPost, BlogPostComment};
use posts_core::error::RepoError;
use posts_core::ports::BlogPostRepository;
use posts_core::{ConflictDetector, PageRequest, PaginatedItems, PostFilter};

use super::entity::blog_post::{self, Entity as PostEntity};
use super::entity::blog_post_comment::{self, Entity as CommentEntity};

/// PostgreSQL blog post repository.
pub struct PostgresBlogPostRepository {
    db: DbConn,
    detector: ConflictDetector,
}

impl PostgresBlogPostRepository {
    pub fn new(db: DbConn, detector: ConflictDetector) -> Self {
        Self { db, detector }
    }

    #[cfg(test)]
    pub(crate) fn into_connection(self) -> DbConn {
        self.db
    }
}

/// Moves the id sequence past explicitly inserted ids.
const SYNC_ID_SEQUENCE: &str = "SELECT setval(pg_get_serial_sequence('blog_posts', 'id'), \
     GREATEST(MAX(id), 1)) FROM blog_posts";

fn map_db_err(err: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return RepoError::Constraint(detail);
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

/// `%`, `_` and `\` in the fragment are matched literally.
pub(crate) fn filter_condition(filter: &PostFilter) -> sea_orm::sea_query::SimpleExpr {
    match filter {
        PostFilter::TitleContains(fragment) => {
            let escaped = fragment
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            let pattern = LikeExpr::new(format!("%{}%", escaped)).escape('\\');
            blog_post::Column::Title.like(pattern)
        }
    }
}

/// Load the comments of `posts` with one query and attach them in id order.
async fn attach_comments<C>(
    conn: &C,
    posts: Vec<blog_post::Model>,
) -> Result<Vec<BlogPost>, DbErr>
where
    C: ConnectionTrait,
{
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    let comments = CommentEntity::find()
        .filter(blog_post_comment::Column::BlogPostId.is_in(ids))
        .order_by_asc(blog_post_comment::Column::Id)
        .all(conn)
        .await?;

    let mut by_post: HashMap<i64, Vec<BlogPostComment>> = HashMap::new();
    for comment in comments {
        by_post
            .entry(comment.blog_post_id)
            .or_default()
            .push(comment.into());
    }

    Ok(posts
        .into_iter()
        .map(|model| {
            let comments = by_post.remove(&model.id).unwrap_or_default();
            BlogPost::from(model).with_comments(comments)
        })
        .collect())
}

async fn load_post<C>(conn: &C, id: i64) -> Result<Option<BlogPost>, DbErr>
where
    C: ConnectionTrait,
{
    let Some(model) = PostEntity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };

    let comments = CommentEntity::find()
        .filter(blog_post_comment::Column::BlogPostId.eq(id))
        .order_by_asc(blog_post_comment::Column::Id)
        .all(conn)
        .await?;

    Ok(Some(
        BlogPost::from(model).with_comments(comments.into_iter().map(Into::into).collect()),
    ))
}

#[async_trait]
impl BlogPostRepository for PostgresBlogPostRepository {
    async fn list_all(&self) -> Result<Vec<BlogPost>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let posts = PostEntity::find().all(&txn).await.map_err(map_db_err)?;
        let posts = attach_comments(&txn, posts).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(posts)
    }

    async fn list_paged(
        &self,
        page: PageRequest,
        filter: Option<&PostFilter>,
    ) -> Result<PaginatedItems<BlogPost>, RepoError> {
        tracing::debug!(
            page_index = page.page_index(),
            page_size = page.page_size(),
            filtered = filter.is_some(),
            "Listing paged posts"
        );

        // Count and slice must observe the same snapshot.
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
            .map_err(map_db_err)?;

        let mut query = PostEntity::find();
        if let Some(filter) = filter {
            query = query.filter(filter_condition(filter));
        }

        let total_items = query.clone().count(&txn).await.map_err(map_db_err)?;

        // Pages past the end are empty; this also keeps OFFSET within BIGINT.
        let offset = page.offset();
        if offset >= total_items {
            txn.commit().await.map_err(map_db_err)?;
            return Ok(PaginatedItems::new(page, total_items, Vec::new()));
        }

        let posts = query
            .order_by_desc(blog_post::Column::Id)
            .offset(offset)
            .limit(page.page_size().min(total_items - offset))
            .all(&txn)
            .await
            .map_err(map_db_err)?;
        let items = attach_comments(&txn, posts).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(PaginatedItems::new(page, total_items, items))
    }

    async fn get(&self, id: i64) -> Result<Option<BlogPost>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let post = load_post(&txn, id).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(post)
    }

    async fn add(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let explicit_id = !post.is_transient();

        let active_model = blog_post::ActiveModel {
            id: if explicit_id { Set(post.id) } else { NotSet },
            title: Set(post.title),
            description: Set(post.description),
            version: Set(BlogPost::INITIAL_VERSION),
        };
        let model = active_model.insert(&txn).await.map_err(map_db_err)?;
        if explicit_id {
            txn.execute(Statement::from_string(
                txn.get_database_backend(),
                SYNC_ID_SEQUENCE,
            ))
            .await
            .map_err(map_db_err)?;
        }

        let mut comments = Vec::with_capacity(post.comments.len());
        for comment in post.comments {
            let saved = blog_post_comment::ActiveModel {
                id: NotSet,
                blog_post_id: Set(model.id),
                author: Set(comment.author),
                content: Set(comment.content),
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
            comments.push(saved.into());
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id = model.id, "Post stored");

        Ok(BlogPost::from(model).with_comments(comments))
    }

    async fn update(&self, post: &BlogPost) -> Result<BlogPost, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut statement = PostEntity::update_many()
            .col_expr(blog_post::Column::Title, Expr::value(post.title.clone()))
            .col_expr(
                blog_post::Column::Description,
                Expr::value(post.description.clone()),
            )
            .col_expr(
                blog_post::Column::Version,
                Expr::col(blog_post::Column::Version).add(1),
            )
            .filter(blog_post::Column::Id.eq(post.id));
        if let Some(expected) = self.detector.expected_version(post.version) {
            statement = statement.filter(blog_post::Column::Version.eq(expected));
        }

        let result = statement.exec(&txn).await.map_err(map_db_err)?;
        if result.rows_affected == 0 {
            // Either the row is gone or its version moved on; the transaction
            // is rolled back when dropped.
            let current = PostEntity::find_by_id(post.id)
                .one(&txn)
                .await
                .map_err(map_db_err)?;
            return Err(match current {
                None => RepoError::post_not_found(post.id),
                Some(row) => RepoError::Conflict {
                    entity: "BlogPost",
                    id: post.id,
                    expected: post.version,
                    actual: row.version,
                },
            });
        }

        let updated = load_post(&txn, post.id)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| RepoError::post_not_found(post.id))?;

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id = post.id, version = updated.version, "Post updated");

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        CommentEntity::delete_many()
            .filter(blog_post_comment::Column::BlogPostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::post_not_found(id));
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<BlogPostComment>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let post = load_post(&txn, post_id)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| RepoError::post_not_found(post_id))?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(post.comments)
    }

    async fn get_comment(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<BlogPostComment>, RepoError> {
        let result = CommentEntity::find()
            .filter(blog_post_comment::Column::BlogPostId.eq(post_id))
            .filter(blog_post_comment::Column::Id.eq(comment_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn add_comment(
        &self,
        post_id: i64,
        comment: BlogPostComment,
    ) -> Result<BlogPostComment, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let parent = PostEntity::find_by_id(post_id)
            .lock_shared()
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if parent.is_none() {
            return Err(RepoError::post_not_found(post_id));
        }

        let saved = blog_post_comment::ActiveModel {
            id: NotSet,
            blog_post_id: Set(post_id),
            author: Set(comment.author),
            content: Set(comment.content),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id, comment_id = saved.id, "Comment stored");

        Ok(saved.into())
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let result = CommentEntity::delete_many()
            .filter(blog_post_comment::Column::BlogPostId.eq(post_id))
            .filter(blog_post_comment::Column::Id.eq(comment_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            let parent = PostEntity::find_by_id(post_id)
                .one(&txn)
                .await
                .map_err(map_db_err)?;
            return Err(match parent {
                None => RepoError::post_not_found(post_id),
                Some(_) => RepoError::comment_not_found(comment_id),
            });
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}
