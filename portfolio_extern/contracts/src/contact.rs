use std::future::Future;

use portfolio_models::contact::ContactMessageDraft;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactApiService: Send + Sync + 'static {
    /// Submit the contact form content to the contact endpoint.
    ///
    /// Returns an error only if no response has been received.
    fn send_message(
        &self,
        message: &ContactMessageDraft,
    ) -> impl Future<Output = anyhow::Result<ContactApiResponse>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactApiResponse {
    /// The endpoint answered with a 2xx status.
    Accepted { message: Option<String> },
    /// The endpoint answered with any other status.
    Rejected { status: u16, error: Option<String> },
}

#[cfg(feature = "mock")]
impl MockContactApiService {
    pub fn with_send_message(
        mut self,
        message: ContactMessageDraft,
        result: ContactApiResponse,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(message))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_message_error(
        mut self,
        message: ContactMessageDraft,
        error: &'static str,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(message))
            .return_once(move |_| Box::pin(std::future::ready(Err(anyhow::anyhow!(error)))));
        self
    }
}
