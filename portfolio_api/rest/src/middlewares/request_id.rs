//! Tag every request with an `X-Request-Id` and echo it in the response.
//!
//! Ids supplied by the client are kept. New ids are time ordered UUIDs,
//! rendered as unpadded url-safe base64.

use axum::{
    http::{HeaderValue, Request},
    Router,
};
use base64::{display::Base64Display, engine::general_purpose::URL_SAFE_NO_PAD};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestIdV7))
}

/// The id of the request, if one has been assigned.
pub fn get<B>(request: &Request<B>) -> Option<&str> {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
}

#[derive(Debug, Clone, Copy)]
struct MakeRequestIdV7;

impl MakeRequestId for MakeRequestIdV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        encode(Uuid::now_v7()).map(RequestId::new)
    }
}

fn encode(id: Uuid) -> Option<HeaderValue> {
    let id = Base64Display::new(id.as_bytes(), &URL_SAFE_NO_PAD).to_string();
    HeaderValue::from_str(&id).ok()
}
