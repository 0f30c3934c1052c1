use serde::{Deserialize, Serialize};

use super::BlogPostComment;

/// BlogPost entity - a post together with the comments it owns.
///
/// `id` is `0` until the post has been stored; the repository assigns one on
/// [`add`](crate::ports::BlogPostRepository::add) unless a positive id was
/// supplied. `version` is the optimistic concurrency token and is never part
/// of the JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub comments: Vec<BlogPostComment>,
    #[serde(skip)]
    pub version: i64,
}

impl BlogPost {
    /// Marker id for a post that has not been persisted yet.
    pub const UNASSIGNED_ID: i64 = 0;

    /// Version stamped on a freshly stored post.
    pub const INITIAL_VERSION: i64 = 1;

    /// Create a new, not yet persisted post.
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Self::UNASSIGNED_ID,
            title: title.into(),
            description,
            comments: Vec::new(),
            version: Self::INITIAL_VERSION,
        }
    }

    /// Whether the repository still has to assign an id.
    pub fn is_transient(&self) -> bool {
        self.id <= Self::UNASSIGNED_ID
    }

    /// Replace the editable fields. Comments and version are left alone.
    pub fn apply_edit(&mut self, title: String, description: Option<String>) {
        self.title = title;
        self.description = description;
    }

    pub fn with_comments(mut self, comments: Vec<BlogPostComment>) -> Self {
        self.comments = comments;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_edit_keeps_comments_and_version() {
        let mut post = BlogPost::new("First", None)
            .with_comments(vec![BlogPostComment::new("Alice", Some("Hi".into()))]);
        post.version = 4;

        post.apply_edit("Second".into(), Some("Body".into()));

        assert_eq!(post.title, "Second");
        assert_eq!(post.description.as_deref(), Some("Body"));
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.version, 4);
    }

    #[test]
    fn test_version_is_not_serialized() {
        let mut post = BlogPost::new("Hello", None);
        post.id = 7;
        post.version = 3;

        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["id"], 7);
        assert!(json.get("version").is_none());
    }
}
