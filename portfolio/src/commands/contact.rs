use anyhow::bail;
use clap::Subcommand;
use portfolio_config::Config;
use portfolio_di::Provide;
use portfolio_form::ContactFormStatus;
use portfolio_models::contact::ContactMessageField;
use url::Url;

use crate::environment::{types::ContactForm, ConfigProvider};

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a message through the contact form of a running server
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        /// Root url of the server [default: form.api_url]
        #[arg(long)]
        url: Option<Url>,
    },
}

impl ContactCommand {
    pub async fn invoke(self, mut config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                name,
                email,
                subject,
                message,
                url,
            } => {
                if let Some(url) = url {
                    config.form.api_url = url;
                }
                send(config, [
                    (ContactMessageField::Name, name),
                    (ContactMessageField::Email, email),
                    (ContactMessageField::Subject, subject),
                    (ContactMessageField::Message, message),
                ])
                .await
            }
        }
    }
}

async fn send(
    config: Config,
    fields: [(ContactMessageField, String); 4],
) -> anyhow::Result<()> {
    let mut provider = ConfigProvider::new(&config)?;
    let form: ContactForm = provider.provide();

    for (field, value) in fields {
        form.update_field(field, value);
    }

    let status = form.submit().await?;
    let message = form.view().message;

    if status != ContactFormStatus::Success {
        bail!("{message}");
    }

    println!("{message}");

    Ok(())
}
