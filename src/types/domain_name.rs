// ABOUTME: DNS hostname validation for the SSL domain.
// ABOUTME: Ensures domains follow RFC 1123 label requirements.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainNameError {
    #[error("domain name cannot be empty")]
    Empty,

    #[error("domain name exceeds maximum length of 253 characters")]
    TooLong,

    #[error("domain name contains an empty label")]
    EmptyLabel,

    #[error("domain label exceeds maximum length of 63 characters")]
    LabelTooLong,

    #[error("domain label cannot start or end with a hyphen")]
    HyphenAtLabelEdge,

    #[error("invalid character in domain name: '{0}'")]
    InvalidChar(char),
}

/// A validated DNS hostname, e.g. `mautic.example.com`.
///
/// The domain is interpolated into nginx configuration and shell command
/// lines, so the character set is restricted to lowercase RFC 1123 labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(String);

impl DomainName {
    pub fn new(value: &str) -> Result<Self, DomainNameError> {
        if value.is_empty() {
            return Err(DomainNameError::Empty);
        }

        if value.len() > 253 {
            return Err(DomainNameError::TooLong);
        }

        for label in value.split('.') {
            if label.is_empty() {
                return Err(DomainNameError::EmptyLabel);
            }

            if label.len() > 63 {
                return Err(DomainNameError::LabelTooLong);
            }

            if label.starts_with('-') || label.ends_with('-') {
                return Err(DomainNameError::HyphenAtLabelEdge);
            }

            for c in label.chars() {
                if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                    return Err(DomainNameError::InvalidChar(c));
                }
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
