//! Code delivery abstraction used by the controller.
//!
//! The controller only asks an issuer for a fresh code bound to a destination.
//! How the code reaches the user (email, SMS, push) is the issuer's concern.
//! The default issuer for local dev is `LogCodeIssuer`, which logs the code
//! instead of sending it.

use anyhow::Result;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::info;

/// Opaque address (email, phone) a code is delivered to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Destination(String);

impl Destination {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues a new one-time code for a destination.
pub trait CodeIssuer: Send + Sync {
    /// Issue a code or return an error if delivery failed.
    fn issue_code(&self, destination: &Destination) -> Result<SecretString>;
}

/// Uniform 4-digit code without a leading zero.
#[must_use]
pub fn generate_code() -> SecretString {
    let code: u16 = rand::thread_rng().gen_range(1000..=9999);
    SecretString::from(code.to_string())
}

/// Issuer that only generates codes; delivery happens elsewhere.
#[derive(Clone, Debug, Default)]
pub struct RandomCodeIssuer;

impl CodeIssuer for RandomCodeIssuer {
    fn issue_code(&self, _destination: &Destination) -> Result<SecretString> {
        Ok(generate_code())
    }
}

/// Local dev issuer that logs the code instead of sending it.
#[derive(Clone, Debug, Default)]
pub struct LogCodeIssuer;

impl CodeIssuer for LogCodeIssuer {
    fn issue_code(&self, destination: &Destination) -> Result<SecretString> {
        let code = generate_code();
        info!(
            destination = %destination,
            code = %code.expose_secret(),
            "code delivery stub"
        );
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_four_digits() {
        for _ in 0..1000 {
            let code = generate_code();
            let code = code.expose_secret();
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn issuers_return_codes() {
        let destination = Destination::new("user@example.com");
        let code = RandomCodeIssuer.issue_code(&destination).unwrap();
        assert_eq!(code.expose_secret().len(), 4);
        let code = LogCodeIssuer.issue_code(&destination).unwrap();
        assert_eq!(code.expose_secret().len(), 4);
    }

    #[test]
    fn destination_display() {
        let destination = Destination::new("user@example.com");
        assert_eq!(destination.to_string(), "user@example.com");
        assert_eq!(destination.as_str(), "user@example.com");
    }
}
