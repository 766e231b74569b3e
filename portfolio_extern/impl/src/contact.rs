use std::{sync::Arc, time::Duration};

use anyhow::Context;
use portfolio_di::Build;
use portfolio_extern_contracts::contact::{ContactApiResponse, ContactApiService};
use portfolio_models::contact::ContactMessageDraft;
use portfolio_utils::trace_instrument;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

const CONTACT_ENDPOINT_PATH: &str = "api/contact";

#[derive(Debug, Clone, Build)]
pub struct ContactApiServiceImpl {
    config: ContactApiServiceConfig,
    #[state]
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ContactApiServiceConfig {
    endpoint: Arc<Url>,
    timeout: Duration,
}

impl ContactApiServiceConfig {
    /// `api_url` is the root of the site serving the contact endpoint.
    pub fn new(api_url: &Url, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = api_url
            .join(CONTACT_ENDPOINT_PATH)
            .with_context(|| format!("Failed to build contact endpoint url from {api_url}"))?;

        Ok(Self {
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ContactApiService for ContactApiServiceImpl {
    #[trace_instrument(skip(self, message), fields(endpoint = %self.config.endpoint))]
    async fn send_message(
        &self,
        message: &ContactMessageDraft,
    ) -> anyhow::Result<ContactApiResponse> {
        let response = self
            .client
            .post((*self.config.endpoint).clone())
            .timeout(self.config.timeout)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .json::<ResponseBody>()
            .await
            .inspect_err(|err| debug!("Failed to read contact endpoint response: {err}"))
            .unwrap_or_default();

        Ok(if status.is_success() {
            ContactApiResponse::Accepted {
                message: body.message,
            }
        } else {
            ContactApiResponse::Rejected {
                status: status.as_u16(),
                error: body.error,
            }
        })
    }
}

#[derive(Default, Deserialize)]
struct ResponseBody {
    message: Option<String>,
    error: Option<String>,
}
