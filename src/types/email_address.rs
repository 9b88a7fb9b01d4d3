// ABOUTME: Contact email validation for the ACME account.
// ABOUTME: Restricts the address to characters that are safe inside a command line.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailAddressError {
    #[error("email address cannot be empty")]
    Empty,

    #[error("email address must contain exactly one '@'")]
    MissingAtSign,

    #[error("email address has an empty local part")]
    EmptyLocalPart,

    #[error("email address has an empty domain part")]
    EmptyDomainPart,

    #[error("invalid character in email address: '{0}'")]
    InvalidChar(char),
}

/// A validated contact email address for certificate registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(value: &str) -> Result<Self, EmailAddressError> {
        if value.is_empty() {
            return Err(EmailAddressError::Empty);
        }

        let mut parts = value.split('@');
        let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => (local, domain),
            _ => return Err(EmailAddressError::MissingAtSign),
        };

        if local.is_empty() {
            return Err(EmailAddressError::EmptyLocalPart);
        }

        if domain.is_empty() {
            return Err(EmailAddressError::EmptyDomainPart);
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '.' | '_' | '%' | '+' | '-' | '@') {
                return Err(EmailAddressError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
