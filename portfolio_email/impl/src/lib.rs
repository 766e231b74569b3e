use std::time::Duration;

use anyhow::anyhow;
use lettre::{
    message::{header, Mailbox, MessageBuilder, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        AsyncSmtpTransportBuilder,
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use portfolio_email_contracts::{Email, EmailBody, EmailService};
use portfolio_models::{email_address::EmailAddressWithName, Sensitive};
use portfolio_utils::{trace_instrument, Apply};

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Use implicit TLS. Otherwise the connection is upgraded using STARTTLS if
    /// the server offers it.
    pub secure: bool,
    pub username: Option<String>,
    pub password: Option<Sensitive<String>>,
    pub timeout: Duration,
}

impl EmailServiceImpl {
    pub fn new(config: &SmtpConfig, from: EmailAddressWithName) -> anyhow::Result<Self> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            let tls = TlsParameters::new(config.host.clone())?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .tls(Tls::Opportunistic(tls))
        };

        let credentials = config
            .username
            .clone()
            .zip(config.password.clone())
            .map(|(username, password)| Credentials::new(username, password.0));

        let transport = builder
            .port(config.port)
            .timeout(Some(config.timeout))
            .apply_map(credentials, AsyncSmtpTransportBuilder::credentials)
            .build();

        Ok(Self { from, transport })
    }

    #[cfg(feature = "dummy")]
    pub fn dummy() -> Self {
        Self::new(
            &SmtpConfig {
                host: "dummy".into(),
                port: 25,
                secure: false,
                username: None,
                password: None,
                timeout: Duration::from_secs(1),
            },
            "dummy@example.com".parse().unwrap(),
        )
        .unwrap()
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let builder = Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(
                email.reply_to.map(|x| Mailbox::new(None, x.0)),
                MessageBuilder::reply_to,
            )
            .subject(email.subject);

        let message = match email.body {
            EmailBody::Text(text) => builder.header(header::ContentType::TEXT_PLAIN).body(text)?,
            EmailBody::Html(html) => builder.header(header::ContentType::TEXT_HTML).body(html)?,
            EmailBody::Alternative { text, html } => {
                builder.multipart(MultiPart::alternative_plain_html(text, html))?
            }
        };

        Ok(message)
    }
}

impl EmailService for EmailServiceImpl {
    #[trace_instrument(skip(self, email), fields(recipient = %email.recipient))]
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map(|response| response.is_positive())
            .map_err(Into::into)
    }

    #[trace_instrument(skip(self))]
    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}
