//! Observability module - request ids on the request root span.

mod request_id;
mod root_span;

pub use request_id::RequestIdMiddleware;
pub use root_span::PostsRootSpanBuilder;
