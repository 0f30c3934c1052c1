//! Root span for every request, with room for a caller-supplied request id.

use actix_web::{
    Error,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
};
use tracing::Span;
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder, root_span};

/// Name of the root span field holding an `X-Request-ID` sent by the client.
pub const CLIENT_REQUEST_ID_FIELD: &str = "client_request_id";

/// The default HTTP root span plus a `client_request_id` field, filled in by
/// [`RequestIdMiddleware`](super::RequestIdMiddleware).
pub struct PostsRootSpanBuilder;

impl RootSpanBuilder for PostsRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        root_span!(request, client_request_id = tracing::field::Empty)
    }

    fn on_request_end<B: MessageBody>(span: Span, outcome: &Result<ServiceResponse<B>, Error>) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}
