use std::sync::Arc;

use portfolio_api_rest::RestServerConfig;
use portfolio_config::Config;
use portfolio_core_contact_impl::ContactFeatureConfig;
use portfolio_core_health_impl::HealthFeatureConfig;
use portfolio_di::provider;
use portfolio_extern_impl::contact::ContactApiServiceConfig;
use portfolio_form::ContactFormConfig;
use types::Email;

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        email: Email,
        ..config: ConfigProvider {
            // API
            RestServerConfig,

            // Extern
            ContactApiServiceConfig,

            // Core
            ContactFeatureConfig,
            HealthFeatureConfig,

            // Client
            ContactFormConfig,
        }
    }
}

impl Provider {
    pub fn new(config: ConfigProvider, email: Email) -> Self {
        Self {
            _cache: Default::default(),
            email,
            config,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        // API
        rest_server_config: RestServerConfig,

        // Extern
        contact_api_service_config: ContactApiServiceConfig,

        // Core
        contact_feature_config: ContactFeatureConfig,
        health_feature_config: HealthFeatureConfig,

        // Client
        contact_form_config: ContactFormConfig,
    }
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig {
            address: config.http.address,
        };

        // Extern
        let contact_api_service_config =
            ContactApiServiceConfig::new(&config.form.api_url, config.form.request_timeout.into())?;

        // Core
        let contact_feature_config = ContactFeatureConfig {
            recipient: Arc::new(config.contact.recipient.clone().into()),
            subject_prefix: config.contact.subject_prefix.as_str().into(),
            owner_name: config.contact.owner_name.as_str().into(),
            owner_title: config.contact.owner_title.as_str().into(),
            owner_tagline: config.contact.owner_tagline.as_str().into(),
        };

        let health_feature_config = HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        };

        // Client
        let contact_form_config = ContactFormConfig {
            status_reset_delay: config.form.status_reset_delay.into(),
        };

        Ok(Self {
            _cache: Default::default(),

            // API
            rest_server_config,

            // Extern
            contact_api_service_config,

            // Core
            contact_feature_config,
            health_feature_config,

            // Client
            contact_form_config,
        })
    }
}
