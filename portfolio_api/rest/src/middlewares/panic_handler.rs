use std::any::Any;

use anyhow::anyhow;
use axum::{response::Response, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::internal_server_error;

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(CatchPanicLayer::custom(handle_panic))
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload");
    internal_server_error(anyhow!("request handler panicked: {message}"))
}
