// ABOUTME: Debian package name validation.
// ABOUTME: Follows Debian policy naming rules (lowercase, at least two characters).

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageNameError {
    #[error("package name cannot be empty")]
    Empty,

    #[error("package name must be at least two characters")]
    TooShort,

    #[error("package name must start with an alphanumeric character")]
    InvalidStart,

    #[error("invalid character in package name: '{0}'")]
    InvalidChar(char),
}

/// A validated Debian package name, e.g. `python3-certbot-nginx`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(value: &str) -> Result<Self, PackageNameError> {
        if value.is_empty() {
            return Err(PackageNameError::Empty);
        }

        if value.len() < 2 {
            return Err(PackageNameError::TooShort);
        }

        let first = value.chars().next().expect("checked non-empty");
        if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
            return Err(PackageNameError::InvalidStart);
        }

        for c in value.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && !matches!(c, '+' | '-' | '.') {
                return Err(PackageNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
