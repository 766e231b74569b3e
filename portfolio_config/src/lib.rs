use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use config::{File, FileFormat};
use portfolio_models::{email_address::EmailAddress, Sensitive};
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

/// Environment variable holding a colon separated list of additional config
/// files. Later files override earlier ones.
pub const CONFIG_PATHS_VAR: &str = "PORTFOLIO_CONFIG";

/// Environment variables that override single config keys.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SMTP_HOST", "email.smtp_host"),
    ("SMTP_PORT", "email.smtp_port"),
    ("SMTP_SECURE", "email.smtp_secure"),
    ("SMTP_USERNAME", "email.smtp_username"),
    ("SMTP_PASSWORD", "email.smtp_password"),
    ("FROM_EMAIL_NAME", "email.from_name"),
    ("FROM_EMAIL", "email.from_address"),
    ("TO_EMAIL", "contact.recipient"),
];

/// Load the config from the process environment.
pub fn load() -> anyhow::Result<Config> {
    load_with(|key| std::env::var(key).ok())
}

/// Load the config, resolving environment variables through `env`.
///
/// The default config is always loaded first, then the files listed in
/// [`CONFIG_PATHS_VAR`], then the [`ENV_OVERRIDES`].
pub fn load_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
    let builder = config::Config::builder().add_source(File::from_str(
        portfolio_assets::CONFIG_TOML,
        FileFormat::Toml,
    ));

    let builder = config_paths(&env)
        .into_iter()
        .try_fold(builder, |builder, path| {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            anyhow::Ok(builder.add_source(File::from_str(&content, FileFormat::Toml)))
        })?;

    let builder = ENV_OVERRIDES
        .iter()
        .try_fold(builder, |builder, &(var, key)| {
            let value = env(var).filter(|value| !value.is_empty());
            builder
                .set_override_option(key, value)
                .with_context(|| format!("Failed to apply {var}"))
        })?;

    builder
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

fn config_paths(env: impl Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    env(CONFIG_PATHS_VAR)
        .map(|paths| {
            paths
                .split(':')
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
    pub form: FormConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub address: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_secure: bool,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<Sensitive<String>>,
    pub smtp_timeout: Duration,
    pub from_name: String,
    pub from_address: EmailAddress,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactConfig {
    pub recipient: EmailAddress,
    pub subject_prefix: String,
    pub owner_name: String,
    pub owner_title: String,
    pub owner_tagline: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    pub api_url: Url,
    pub status_reset_delay: Duration,
    pub request_timeout: Duration,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn load_default_config() {
        let config = load_with(env(&[])).unwrap();

        assert_eq!(config.http.address, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.email.smtp_port, 587);
        assert!(!config.email.smtp_secure);
        assert_eq!(config.email.smtp_username, None);
        assert!(config.email.smtp_password.is_none());
        assert_eq!(config.contact.subject_prefix, "Portfolio Contact: ");
        assert_eq!(
            *config.form.status_reset_delay,
            std::time::Duration::from_secs(5)
        );
    }

    #[test]
    fn env_overrides() {
        let config = load_with(env(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_SECURE", "true"),
            ("SMTP_USERNAME", "user"),
            ("SMTP_PASSWORD", "hunter2"),
            ("FROM_EMAIL_NAME", "Website"),
            ("FROM_EMAIL", "website@example.com"),
            ("TO_EMAIL", "owner@example.com"),
        ]))
        .unwrap();

        assert_eq!(config.email.smtp_host, "smtp.example.com");
        assert_eq!(config.email.smtp_port, 465);
        assert!(config.email.smtp_secure);
        assert_eq!(config.email.smtp_username.as_deref(), Some("user"));
        assert_eq!(
            config.email.smtp_password.as_deref().map(String::as_str),
            Some("hunter2")
        );
        assert_eq!(config.email.from_name, "Website");
        assert_eq!(config.email.from_address.as_str(), "website@example.com");
        assert_eq!(config.contact.recipient.as_str(), "owner@example.com");
    }

    #[test]
    fn empty_env_vars_are_ignored() {
        let config = load_with(env(&[("SMTP_HOST", ""), ("SMTP_USERNAME", "")])).unwrap();

        assert_eq!(config.email.smtp_host, "127.0.0.1");
        assert_eq!(config.email.smtp_username, None);
    }

    #[test]
    fn invalid_env_var() {
        load_with(env(&[("SMTP_PORT", "not-a-port")])).unwrap_err();
        load_with(env(&[("TO_EMAIL", "not-an-email")])).unwrap_err();
    }

    #[test]
    fn additional_config_files() {
        let dir = std::env::temp_dir().join(format!("portfolio-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("first.toml");
        let second = dir.join("second.toml");
        std::fs::write(&first, "[http]\naddress = \"0.0.0.0:80\"\n[health]\ncache_ttl = \"1m\"\n")
            .unwrap();
        std::fs::write(&second, "[http]\naddress = \"0.0.0.0:8080\"\n").unwrap();
        let paths = format!("{}:{}", first.display(), second.display());

        let config = load_with(env(&[(CONFIG_PATHS_VAR, &paths)])).unwrap();

        assert_eq!(config.http.address, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(*config.health.cache_ttl, std::time::Duration::from_secs(60));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_config_file() {
        load_with(env(&[(CONFIG_PATHS_VAR, "/nonexistent/portfolio.toml")])).unwrap_err();
    }
}
