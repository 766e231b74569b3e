use std::ops::Deref;

use portfolio_utils::portfolio_version;
use tracing::warn;

/// `User-Agent` sent with every outgoing request.
pub fn user_agent() -> String {
    format!(
        "portfolio/{} (+{})",
        portfolio_version(),
        env!("CARGO_PKG_HOMEPAGE")
    )
}

/// `reqwest` client shared between the clones of a service.
#[derive(Debug, Clone)]
pub struct HttpClient(reqwest::Client);

impl Deref for HttpClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent())
            .build()
            .unwrap_or_else(|err| {
                warn!("Failed to configure http client, using defaults: {err}");
                reqwest::Client::new()
            });
        Self(client)
    }
}
