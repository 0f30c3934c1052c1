use serde::{Deserialize, Serialize};

/// Comment attached to a [`BlogPost`](super::BlogPost).
///
/// Ids are only unique within the parent post's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostComment {
    pub id: i64,
    pub author: String,
    pub content: Option<String>,
}

impl BlogPostComment {
    pub fn new(author: impl Into<String>, content: Option<String>) -> Self {
        Self {
            id: 0,
            author: author.into(),
            content,
        }
    }
}
