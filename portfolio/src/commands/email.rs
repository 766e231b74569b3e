use anyhow::ensure;
use clap::Subcommand;
use portfolio_config::Config;
use portfolio_email_contracts::{Email, EmailBody, EmailService};
use portfolio_models::email_address::EmailAddressWithName;
use tracing::info;

use crate::email;

const TEST_SUBJECT: &str = "Portfolio: SMTP test";
const TEST_TEXT: &str = "If you can read this, the portfolio can deliver email.";
const TEST_HTML: &str = "<p>If you can read this, the portfolio can deliver <b>html</b> email.</p>";

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Send a test email through the configured SMTP server
    Test {
        recipient: EmailAddressWithName,
        /// Send a multipart message with an html alternative
        #[arg(long)]
        html: bool,
    },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Test { recipient, html } => test(config, recipient, html).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName, html: bool) -> anyhow::Result<()> {
    let email_service = email::connect(&config.email)?;

    let email = Email {
        recipient,
        subject: TEST_SUBJECT.into(),
        body: test_body(html),
        reply_to: None,
    };
    info!(recipient = %email.recipient, html, "Sending test email");

    ensure!(
        email_service.send(email).await?,
        "The SMTP server did not accept the test email"
    );
    println!("Test email sent");

    Ok(())
}

fn test_body(html: bool) -> EmailBody {
    if html {
        EmailBody::Alternative {
            text: TEST_TEXT.into(),
            html: TEST_HTML.into(),
        }
    } else {
        EmailBody::Text(TEST_TEXT.into())
    }
}

#[cfg(test)]
mod tests {
    use portfolio_utils::assert_matches;

    use super::*;

    #[test]
    fn body() {
        assert_matches!(test_body(false), EmailBody::Text(text) if text == TEST_TEXT);
        assert_matches!(
            test_body(true),
            EmailBody::Alternative { html, .. } if html == TEST_HTML
        );
    }
}
