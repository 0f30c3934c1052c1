#[cfg(test)]
mod tests {
    use crate::database::entity::{blog_post, blog_post_comment};
    use crate::database::postgres_repo::PostgresBlogPostRepository;
    use posts_core::domain::{BlogPost, BlogPostComment};
    use posts_core::error::RepoError;
    use posts_core::ports::BlogPostRepository;
    use posts_core::{ConflictDetector, PageRequest, PostFilter};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn post_model(id: i64, title: &str, version: i64) -> blog_post::Model {
        blog_post::Model {
            id,
            title: title.to_owned(),
            description: Some("Content".to_owned()),
            version,
        }
    }

    fn comment_model(id: i64, post_id: i64, author: &str) -> blog_post_comment::Model {
        blog_post_comment::Model {
            id,
            blog_post_id: post_id,
            author: author.to_owned(),
            content: None,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(total)))])
    }

    /// Every statement the repository sent, with parameters inlined.
    fn executed_sql(repo: PostgresBlogPostRepository) -> Vec<String> {
        repo.into_connection()
            .into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.to_string()))
            .collect()
    }

    fn update_sql(statements: &[String]) -> &str {
        statements
            .iter()
            .find(|sql| sql.starts_with("UPDATE"))
            .map(String::as_str)
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_post_with_comments() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(7, "Test Post", 3)]])
            .append_query_results([vec![
                comment_model(1, 7, "Alice"),
                comment_model(2, 7, "Bob"),
            ]])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());

        let post = repo.get(7).await.unwrap().unwrap();

        assert_eq!(post.id, 7);
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.version, 3);
        assert_eq!(post.comments.len(), 2);
        assert_eq!(post.comments[1].author, "Bob");
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());

        assert!(repo.get(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_returns_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(11, "Fresh", 1)]])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());

        let stored = repo
            .add(BlogPost::new("Fresh", Some("Content".into())))
            .await
            .unwrap();

        assert_eq!(stored.id, 11);
        assert_eq!(stored.version, BlogPost::INITIAL_VERSION);
        assert!(!executed_sql(repo).iter().any(|sql| sql.contains("setval")));
    }

    #[tokio::test]
    async fn test_add_with_supplied_id_moves_sequence() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(42, "Explicit", 1)]])
            .append_exec_results([exec(1)])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());
        let mut post = BlogPost::new("Explicit", None);
        post.id = 42;

        assert_eq!(repo.add(post).await.unwrap().id, 42);

        let statements = executed_sql(repo);
        let insert = statements.iter().position(|sql| sql.starts_with("INSERT"));
        let sync = statements.iter().position(|sql| sql.contains("setval"));
        assert!(matches!((insert, sync), (Some(i), Some(s)) if i < s));
        assert!(statements.last().is_some_and(|sql| sql == "COMMIT"));
    }

    #[tokio::test]
    async fn test_add_persists_comments() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(11, "Fresh", 1)]])
            .append_query_results([vec![comment_model(1, 11, "Alice")]])
            .append_query_results([vec![comment_model(2, 11, "Bob")]])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());
        let post = BlogPost::new("Fresh", None).with_comments(vec![
            BlogPostComment::new("Alice", None),
            BlogPostComment::new("Bob", None),
        ]);

        let stored = repo.add(post).await.unwrap();

        assert_eq!(stored.id, 11);
        let comments: Vec<(i64, &str)> = stored
            .comments
            .iter()
            .map(|c| (c.id, c.author.as_str()))
            .collect();
        assert_eq!(comments, vec![(1, "Alice"), (2, "Bob")]);

        let statements = executed_sql(repo);
        let comment_inserts = statements
            .iter()
            .filter(|sql| sql.starts_with("INSERT INTO \"blog_post_comments\""))
            .count();
        assert_eq!(comment_inserts, 2);
    }

    #[tokio::test]
    async fn test_paged_slice_is_limited_to_remaining_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(3)]])
            .append_query_results([vec![post_model(1, "Oldest", 1)]])
            .append_query_results([Vec::<blog_post_comment::Model>::new()])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());

        let page = repo
            .list_paged(PageRequest::new(1, 2).unwrap(), None)
            .await
            .unwrap();

        assert_eq!(page.total_items, 3);
        assert_eq!(page.items.len(), 1);
        let statements = executed_sql(repo);
        assert!(statements.iter().any(|sql| sql.contains("LIMIT 1 OFFSET 2")));
    }

    #[tokio::test]
    async fn test_pages_past_the_end_are_empty() {
        for index in [5, 4_611_686_018_427_387_904, u64::MAX] {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(3)]])
                .into_connection();

            let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());

            let page = repo
                .list_paged(PageRequest::new(index, 2).unwrap(), None)
                .await
                .unwrap();

            assert!(page.items.is_empty());
            assert_eq!(page.total_items, 3);
            assert_eq!(page.page_index, index);
            assert!(!executed_sql(repo).iter().any(|sql| sql.contains("OFFSET")));
        }
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .append_query_results([vec![post_model(7, "Edited", 3)]])
            .append_query_results([Vec::<blog_post_comment::Model>::new()])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());
        let mut post = BlogPost::new("Edited", None);
        post.id = 7;
        post.version = 2;

        let updated = repo.update(&post).await.unwrap();

        assert_eq!(updated.version, 3);
        assert_eq!(updated.title, "Edited");

        let statements = executed_sql(repo);
        let sql = update_sql(&statements);
        assert!(sql.contains("\"version\" = \"version\" + 1"));
        assert!(sql.contains("\"blog_posts\".\"version\" = 2"));
    }

    #[tokio::test]
    async fn test_update_without_detection_drops_version_guard() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .append_query_results([vec![post_model(7, "Overwrite", 6)]])
            .append_query_results([vec![comment_model(1, 7, "Alice")]])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::disabled());
        let mut stale = BlogPost::new("Overwrite", None);
        stale.id = 7;
        stale.version = 2;

        let updated = repo.update(&stale).await.unwrap();

        assert_eq!(updated.version, 6);
        assert_eq!(updated.comments.len(), 1);

        let statements = executed_sql(repo);
        let sql = update_sql(&statements);
        assert!(sql.contains("\"version\" = \"version\" + 1"));
        assert!(!sql.contains("\"blog_posts\".\"version\" ="));
        assert!(!statements.iter().any(|sql| sql.starts_with("DELETE")));
    }

    #[tokio::test]
    async fn test_update_with_stale_version_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .append_query_results([vec![post_model(7, "Someone Else", 5)]])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());
        let mut post = BlogPost::new("Mine", None);
        post.id = 7;
        post.version = 2;

        let err = repo.update(&post).await.unwrap_err();

        assert!(matches!(
            err,
            RepoError::Conflict {
                id: 7,
                expected: 2,
                actual: 5,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());
        let mut post = BlogPost::new("Mine", None);
        post.id = 8;

        assert!(matches!(
            repo.update(&post).await,
            Err(RepoError::NotFound { id: 8, .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0), exec(0)])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());

        assert!(matches!(
            repo.delete(3).await,
            Err(RepoError::NotFound { id: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_add_comment_to_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();

        let repo = PostgresBlogPostRepository::new(db, ConflictDetector::optimistic());

        let result = repo
            .add_comment(
                999,
                posts_core::domain::BlogPostComment::new("Alice", None),
            )
            .await;

        assert!(matches!(result, Err(RepoError::NotFound { id: 999, .. })));
    }

    #[test]
    fn test_title_filter_is_escaped() {
        use sea_orm::{EntityTrait, QueryFilter, QueryTrait};

        let sql = blog_post::Entity::find()
            .filter(crate::database::postgres_repo::filter_condition(
                &PostFilter::title_contains("100%"),
            ))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("LIKE"));
        assert!(sql.contains("ESCAPE"));
        assert!(sql.contains("100\\"));
    }
}
