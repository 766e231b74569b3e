use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shape an author email must have: `local@domain.tld` without whitespace or
/// additional `@` characters. This is not a full RFC 5322 check.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Unvalidated contact form content as it is sent over the wire.
///
/// Missing and `null` fields are read as empty strings, so that
/// [`ContactMessage::try_from`] can report them as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessageDraft {
    #[serde(
        default,
        deserialize_with = "portfolio_utils::serde::nullable_string::deserialize"
    )]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "portfolio_utils::serde::nullable_string::deserialize"
    )]
    pub email: String,
    #[serde(
        default,
        deserialize_with = "portfolio_utils::serde::nullable_string::deserialize"
    )]
    pub subject: String,
    #[serde(
        default,
        deserialize_with = "portfolio_utils::serde::nullable_string::deserialize"
    )]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactMessageField {
    Name,
    Email,
    Subject,
    Message,
}

impl ContactMessageDraft {
    pub fn get(&self, field: ContactMessageField) -> &str {
        match field {
            ContactMessageField::Name => &self.name,
            ContactMessageField::Email => &self.email,
            ContactMessageField::Subject => &self.subject,
            ContactMessageField::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: ContactMessageField, value: String) {
        let slot = match field {
            ContactMessageField::Name => &mut self.name,
            ContactMessageField::Email => &mut self.email,
            ContactMessageField::Subject => &mut self.subject,
            ContactMessageField::Message => &mut self.message,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub subject: ContactMessageSubject,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: ContactMessageAuthorEmail,
}

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, AsRef, Display, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    validate(not_empty, regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, AsRef, Display, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorEmail(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, AsRef, Display, Serialize, Deserialize)
)]
pub struct ContactMessageSubject(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, AsRef, Display, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactMessageValidationError {
    #[error("All fields are required")]
    MissingField,
    #[error("Invalid email format")]
    InvalidEmail,
}

impl TryFrom<ContactMessageDraft> for ContactMessage {
    type Error = ContactMessageValidationError;

    /// Validates a draft. A missing field is reported before a malformed email
    /// address.
    fn try_from(draft: ContactMessageDraft) -> Result<Self, Self::Error> {
        let ContactMessageDraft {
            name,
            email,
            subject,
            message,
        } = draft;

        if email.is_empty() {
            return Err(ContactMessageValidationError::MissingField);
        }

        let (Ok(name), Ok(subject), Ok(content)) = (
            ContactMessageAuthorName::try_new(name),
            ContactMessageSubject::try_new(subject),
            ContactMessageContent::try_new(message),
        ) else {
            return Err(ContactMessageValidationError::MissingField);
        };

        let email = ContactMessageAuthorEmail::try_new(email)
            .map_err(|_| ContactMessageValidationError::InvalidEmail)?;

        Ok(Self {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
        })
    }
}
