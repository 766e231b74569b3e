use std::sync::Arc;

use chrono::{DateTime, Utc};
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_di::Build;
use portfolio_email_contracts::{Email, EmailBody, EmailService};
use portfolio_models::{
    contact::ContactMessage,
    email_address::{EmailAddress, EmailAddressWithName},
};
use portfolio_shared_contracts::time::TimeService;
use portfolio_templates_contracts::{
    ContactMessageHtmlTemplate, ContactMessageTextTemplate, TemplateService,
};
use portfolio_utils::trace_instrument;
use tracing::{info, warn};

/// `Sunday, October 18, 2026 at 06:27 PM UTC`
const HTML_TIMESTAMP_FORMAT: &str = "%A, %B %-d, %Y at %I:%M %p UTC";

/// `10/18/2026, 6:27:00 PM`
const TEXT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Clone, Build)]
pub struct ContactFeatureServiceImpl<Time, Template, Email> {
    time: Time,
    template: Template,
    email: Email,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    pub recipient: Arc<EmailAddressWithName>,
    pub subject_prefix: Arc<str>,
    pub owner_name: Arc<str>,
    pub owner_title: Arc<str>,
    pub owner_tagline: Arc<str>,
}

impl<Time, Template, EmailS> ContactFeatureService
    for ContactFeatureServiceImpl<Time, Template, EmailS>
where
    Time: TimeService,
    Template: TemplateService,
    EmailS: EmailService,
{
    #[trace_instrument(skip(self, message))]
    async fn send_message(&self, message: ContactMessage) -> Result<(), ContactSendMessageError> {
        let reply_to = message
            .author
            .email
            .parse::<EmailAddress>()
            .inspect_err(|err| {
                warn!(
                    email = %*message.author.email,
                    "Author email is not a valid reply-to address, sending without: {err}"
                )
            })
            .ok();

        let (text, html) = self.render(&message, self.time.now())?;

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("{}{}", self.config.subject_prefix, *message.subject),
            body: EmailBody::Alternative { text, html },
            reply_to,
        };

        if !self.email.send(email).await? {
            return Err(ContactSendMessageError::Send);
        }

        info!(reply_to = %*message.author.email, "Delivered contact message");

        Ok(())
    }
}

impl<Time, Template, EmailS> ContactFeatureServiceImpl<Time, Template, EmailS>
where
    Template: TemplateService,
{
    /// Render the plain text and the html body of the notification email.
    fn render(
        &self,
        message: &ContactMessage,
        received_at: DateTime<Utc>,
    ) -> anyhow::Result<(String, String)> {
        let text = self.template.render(&ContactMessageTextTemplate {
            name: message.author.name.to_string(),
            email: message.author.email.to_string(),
            subject: message.subject.to_string(),
            message: message.content.to_string(),
            received_at: received_at.format(TEXT_TIMESTAMP_FORMAT).to_string(),
            owner_name: self.config.owner_name.to_string(),
            owner_tagline: self.config.owner_tagline.to_string(),
        })?;

        let html = self.template.render(&ContactMessageHtmlTemplate {
            name: message.author.name.to_string(),
            email: message.author.email.to_string(),
            subject: message.subject.to_string(),
            message: message.content.to_string(),
            received_at: received_at.format(HTML_TIMESTAMP_FORMAT).to_string(),
            owner_name: self.config.owner_name.to_string(),
            owner_title: self.config.owner_title.to_string(),
        })?;

        Ok((text, html))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use portfolio_email_contracts::MockEmailService;
    use portfolio_models::contact::ContactMessageDraft;
    use portfolio_shared_contracts::time::MockTimeService;
    use portfolio_templates_contracts::MockTemplateService;
    use portfolio_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> ContactFeatureConfig {
        ContactFeatureConfig {
            recipient: Arc::new("contact@example.com".parse().unwrap()),
            subject_prefix: "Portfolio Contact: ".into(),
            owner_name: "Salman Shafi".into(),
            owner_title: "System Administrator".into(),
            owner_tagline: "System Administrator & DNS Expert".into(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 18, 27, 5).unwrap()
    }

    fn message() -> ContactMessage {
        ContactMessageDraft {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            subject: "Hello".into(),
            message: "Hi there".into(),
        }
        .try_into()
        .unwrap()
    }

    fn template() -> MockTemplateService {
        MockTemplateService::new()
            .with_render(
                ContactMessageTextTemplate {
                    name: "Jane Doe".into(),
                    email: "jane@example.com".into(),
                    subject: "Hello".into(),
                    message: "Hi there".into(),
                    received_at: "10/18/2026, 6:27:05 PM".into(),
                    owner_name: "Salman Shafi".into(),
                    owner_tagline: "System Administrator & DNS Expert".into(),
                },
                "text body".into(),
            )
            .with_render(
                ContactMessageHtmlTemplate {
                    name: "Jane Doe".into(),
                    email: "jane@example.com".into(),
                    subject: "Hello".into(),
                    message: "Hi there".into(),
                    received_at: "Sunday, October 18, 2026 at 06:27 PM UTC".into(),
                    owner_name: "Salman Shafi".into(),
                    owner_title: "System Administrator".into(),
                },
                "html body".into(),
            )
    }

    fn expected_email() -> Email {
        Email {
            recipient: "contact@example.com".parse().unwrap(),
            subject: "Portfolio Contact: Hello".into(),
            body: EmailBody::Alternative {
                text: "text body".into(),
                html: "html body".into(),
            },
            reply_to: Some("jane@example.com".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let email = MockEmailService::new().with_send(expected_email(), true);

        let sut = ContactFeatureServiceImpl {
            time,
            template: template(),
            email,
            config: config(),
        };

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn rejected() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let email = MockEmailService::new().with_send(expected_email(), false);

        let sut = ContactFeatureServiceImpl {
            time,
            template: template(),
            email,
            config: config(),
        };

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send));
    }

    #[tokio::test]
    async fn transport_error() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let email =
            MockEmailService::new().with_send_error(expected_email(), "connection refused");

        let sut = ContactFeatureServiceImpl {
            time,
            template: template(),
            email,
            config: config(),
        };

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Other(_)));
    }

    #[tokio::test]
    async fn render_error() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let mut template = MockTemplateService::new();
        template
            .expect_render::<ContactMessageTextTemplate>()
            .once()
            .return_once(|_| Err(anyhow::anyhow!("broken template")));
        let email = MockEmailService::new();

        let sut = ContactFeatureServiceImpl {
            time,
            template,
            email,
            config: config(),
        };

        // Act
        let result = sut.send_message(message()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Other(_)));
    }

    #[tokio::test]
    async fn same_message_twice_is_sent_twice() {
        // Arrange
        let mut time = MockTimeService::new();
        time.expect_now().times(2).return_const(now());

        let mut template = MockTemplateService::new();
        template
            .expect_render::<ContactMessageTextTemplate>()
            .times(2)
            .returning(|_| Ok("text body".into()));
        template
            .expect_render::<ContactMessageHtmlTemplate>()
            .times(2)
            .returning(|_| Ok("html body".into()));

        let mut email = MockEmailService::new();
        email
            .expect_send()
            .times(2)
            .with(mockall::predicate::eq(expected_email()))
            .returning(|_| Box::pin(std::future::ready(Ok(true))));

        let sut = ContactFeatureServiceImpl {
            time,
            template,
            email,
            config: config(),
        };

        // Act
        let first = sut.send_message(message()).await;
        let second = sut.send_message(message()).await;

        // Assert
        first.unwrap();
        second.unwrap();
    }

    #[tokio::test]
    async fn author_email_unusable_as_reply_to() {
        // Arrange
        let message = ContactMessageDraft {
            name: "Jane Doe".into(),
            email: "jane,doe@example.com".into(),
            subject: "Hello".into(),
            message: "Hi there".into(),
        }
        .try_into()
        .unwrap();

        let time = MockTimeService::new().with_now(now());

        let mut template = MockTemplateService::new();
        template
            .expect_render::<ContactMessageTextTemplate>()
            .once()
            .withf(|template| template.email == "jane,doe@example.com")
            .return_once(|_| Ok("text body".into()));
        template
            .expect_render::<ContactMessageHtmlTemplate>()
            .once()
            .withf(|template| template.email == "jane,doe@example.com")
            .return_once(|_| Ok("html body".into()));

        let email = MockEmailService::new().with_send(
            Email {
                reply_to: None,
                ..expected_email()
            },
            true,
        );

        let sut = ContactFeatureServiceImpl {
            time,
            template,
            email,
            config: config(),
        };

        // Act
        let result = sut.send_message(message).await;

        // Assert
        result.unwrap();
    }

    #[test]
    fn timestamp_formats() {
        let time = Utc.with_ymd_and_hms(2026, 1, 5, 9, 4, 3).unwrap();

        assert_eq!(
            time.format(HTML_TIMESTAMP_FORMAT).to_string(),
            "Monday, January 5, 2026 at 09:04 AM UTC"
        );
        assert_eq!(
            time.format(TEXT_TIMESTAMP_FORMAT).to_string(),
            "1/5/2026, 9:04:03 AM"
        );
    }
}
