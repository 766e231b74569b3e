use anyhow::Context;
use portfolio_config::EmailConfig;
use portfolio_email_impl::{EmailServiceImpl, SmtpConfig};

/// Connect to the SMTP server
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    let smtp_config = SmtpConfig {
        host: config.smtp_host.clone(),
        port: config.smtp_port,
        secure: config.smtp_secure,
        username: config.smtp_username.clone(),
        password: config.smtp_password.clone(),
        timeout: config.smtp_timeout.into(),
    };
    let from = config
        .from_address
        .clone()
        .with_name(config.from_name.clone());

    EmailServiceImpl::new(&smtp_config, from).context("Failed to connect to SMTP server")
}
