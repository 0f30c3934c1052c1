//! Filters applied to paged post listings.

use crate::domain::BlogPost;

/// Predicate over [`BlogPost`] understood by every storage engine.
///
/// In-memory stores evaluate it with [`PostFilter::matches`]; SQL stores
/// translate each variant into a `WHERE` clause with the same semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Case-sensitive substring match on the title.
    TitleContains(String),
}

impl PostFilter {
    pub fn title_contains(fragment: impl Into<String>) -> Self {
        PostFilter::TitleContains(fragment.into())
    }

    pub fn matches(&self, post: &BlogPost) -> bool {
        match self {
            PostFilter::TitleContains(fragment) => post.title.contains(fragment.as_str()),
        }
    }
}
