use std::time::Duration;

use axum::{
    extract::{MatchedPath, Request},
    response::Response,
    Router,
};
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{debug, warn, Span};

use super::request_id;

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(make_span)
            .on_request(on_request)
            .on_response(on_response)
            .on_body_chunk(())
            .on_eos(())
            .on_failure(on_failure),
    )
}

fn make_span(request: &Request) -> Span {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    tracing::debug_span!(
        "http-request",
        version = ?request.version(),
        method = %request.method(),
        route,
        request_id = request_id::get(request),
    )
}

fn on_request(_request: &Request, _span: &Span) {
    debug!("started processing request")
}

fn on_response(response: &Response, latency: Duration, _span: &Span) {
    debug!(?latency, status = %response.status(), "finished processing request")
}

fn on_failure(failure: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    warn!(?latency, %failure, "request failed")
}
