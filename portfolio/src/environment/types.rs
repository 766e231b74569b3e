use portfolio_core_contact_impl::ContactFeatureServiceImpl;
use portfolio_core_health_impl::HealthFeatureServiceImpl;
use portfolio_email_impl::EmailServiceImpl;
use portfolio_extern_impl::contact::ContactApiServiceImpl;
use portfolio_shared_impl::time::TimeServiceImpl;
use portfolio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = portfolio_api_rest::RestServer<HealthFeature, ContactFeature>;

// Email
pub type Email = EmailServiceImpl;

// Extern
pub type ContactApi = ContactApiServiceImpl;

// Template
pub type Template = TemplateServiceImpl;

// Shared
pub type Time = TimeServiceImpl;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;
pub type ContactFeature = ContactFeatureServiceImpl<Time, Template, Email>;

// Client
pub type ContactForm = portfolio_form::ContactForm<ContactApi>;
