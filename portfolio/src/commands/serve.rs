use anyhow::Context;
use portfolio_config::Config;
use portfolio_di::Provide;
use portfolio_email_contracts::EmailService;
use tracing::info;

use crate::{
    email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!(
        "Connecting to smtp server at {}:{}",
        config.email.smtp_host, config.email.smtp_port
    );
    let email = email::connect(&config.email)?;
    email
        .ping()
        .await
        .context("Failed to reach the smtp server")?;

    let config_provider = ConfigProvider::new(&config)?;
    let mut provider = Provider::new(config_provider, email);
    let server: RestServer = provider.provide();
    info!("Starting http server on {}", config.http.address);
    server.serve().await
}
