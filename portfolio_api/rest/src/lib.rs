use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use portfolio_core_contact_contracts::ContactFeatureService;
use portfolio_core_health_contracts::HealthFeatureService;
use portfolio_di::Build;
use tokio::net::TcpListener;
use tracing::info;

mod errors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone, Build)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub address: SocketAddr,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.address)
            .await
            .with_context(|| format!("Failed to bind to {}", self.config.address))?;
        info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .await
            .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()));

        layers(router)
    }
}

/// Wrap a router in the middlewares shared by all routes. The request id is
/// assigned first, so that it is available to the trace span.
fn layers(router: Router<()>) -> Router<()> {
    let router = middlewares::panic_handler::add(router);
    let router = middlewares::trace::add(router);
    middlewares::request_id::add(router)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{routing, Router};
    use pretty_assertions::assert_eq;
    use tokio::net::TcpListener;

    use super::layers;

    /// Serve `router` with all middlewares on an ephemeral port.
    pub async fn spawn(router: Router<()>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, layers(router)).await });
        addr
    }

    #[tokio::test]
    async fn request_id_header() {
        let addr = spawn(Router::new().route("/ok", routing::get(|| async { "ok" }))).await;

        let mut ids = Vec::new();
        for _ in 0..2 {
            let response = reqwest::get(format!("http://{addr}/ok")).await.unwrap();
            assert_eq!(response.status(), 200);
            let id = response.headers()["x-request-id"].to_str().unwrap().to_owned();
            assert_eq!(id.len(), 22);
            ids.push(id);
        }
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn request_id_from_client_is_kept() {
        let addr = spawn(Router::new().route("/ok", routing::get(|| async { "ok" }))).await;

        let response = reqwest::Client::new()
            .get(format!("http://{addr}/ok"))
            .header("x-request-id", "client-id")
            .send()
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "client-id");
    }

    #[tokio::test]
    async fn handler_panics() {
        async fn panics() -> &'static str {
            panic!("boom")
        }
        let addr = spawn(Router::new().route("/panic", routing::get(panics))).await;

        let response = reqwest::get(format!("http://{addr}/panic")).await.unwrap();

        assert_eq!(response.status(), 500);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            response.json::<serde_json::Value>().await.unwrap(),
            serde_json::json!({"error": "Internal server error"})
        );
    }
}
