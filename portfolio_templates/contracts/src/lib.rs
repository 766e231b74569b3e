use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

/// Data of a template.
///
/// Templates whose name ends in `.html` are rendered with HTML escaping, all
/// other templates are rendered verbatim.
pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

macro_rules! templates {
    ($( $ident:ident ( $name:literal, $template:path ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $name;
                const TEMPLATE: &'static str = $template;
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    ContactMessageHtmlTemplate(
        "contact_message.html",
        portfolio_assets::templates::CONTACT_MESSAGE_HTML
    ),
    ContactMessageTextTemplate(
        "contact_message.txt",
        portfolio_assets::templates::CONTACT_MESSAGE_TXT
    ),
}

/// HTML body of the notification sent for a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessageHtmlTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub received_at: String,
    pub owner_name: String,
    pub owner_title: String,
}

/// Plain text body of the notification sent for a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessageTextTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub received_at: String,
    pub owner_name: String,
    pub owner_tagline: String,
}
