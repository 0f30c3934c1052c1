//! Domain entities - the core business objects.

mod blog_post;
mod comment;

pub use blog_post::BlogPost;
pub use comment::BlogPostComment;
