//! Account recovery entry point.
//!
//! A recovery starts from an email and a phone number. Both are validated,
//! the pair is looked up in an `AccountDirectory`, and only then is the first
//! code issued and an `OtpController` created for the normalized email. After
//! the code is verified the caller collects the new password and checks it
//! with `validate_password_change`.

pub mod directory;
pub mod validation;

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::otp::{CodeIssuer, Destination, Navigator, OtpConfig, OtpController, OtpError};

pub use directory::{AccountDirectory, AccountRecord, StaticAccountDirectory};
pub use validation::{
    normalize_email, validate_password_change, validate_request, FieldError, PasswordChangeError,
};

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("invalid recovery request: {}", join_errors(.0))]
    Invalid(Vec<FieldError>),
    #[error("No account matches the provided email and phone number")]
    AccountNotFound,
    #[error(transparent)]
    Otp(#[from] OtpError),
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate the request, look up the account and issue the first code.
///
/// # Errors
/// Returns `RecoveryError::Invalid` with every field problem, `AccountNotFound`
/// when the pair is unknown, and `Otp(Delivery)` if the code cannot be issued.
#[instrument(skip_all)]
pub fn start_recovery(
    directory: &dyn AccountDirectory,
    issuer: Arc<dyn CodeIssuer>,
    navigator: Arc<dyn Navigator>,
    config: &OtpConfig,
    email: &str,
    phone: &str,
) -> Result<OtpController, RecoveryError> {
    let email = email.trim();
    let phone = phone.trim();
    validate_request(email, phone).map_err(RecoveryError::Invalid)?;

    let email = normalize_email(email);
    if !directory.contains(&email, phone) {
        warn!("recovery requested for unknown account");
        return Err(RecoveryError::AccountNotFound);
    }

    info!(email = %email, "recovery started");
    let controller = OtpController::new(Destination::new(email), issuer, navigator, config)?;
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otp::testing::{FailingIssuer, QueuedIssuer, RecordingNavigator};

    fn directory() -> StaticAccountDirectory {
        StaticAccountDirectory::new([AccountRecord::new("1@gmail.com", "1111111111")])
    }

    fn start(
        issuer: Arc<dyn CodeIssuer>,
        email: &str,
        phone: &str,
    ) -> Result<OtpController, RecoveryError> {
        start_recovery(
            &directory(),
            issuer,
            Arc::new(RecordingNavigator::default()),
            &OtpConfig::default(),
            email,
            phone,
        )
    }

    #[test]
    fn known_account_gets_controller() {
        let issuer = Arc::new(QueuedIssuer::new(["4821"]));
        let mut controller = start(issuer.clone(), " 1@Gmail.com ", "1111111111").unwrap();
        assert_eq!(issuer.issued(), 1);
        assert_eq!(controller.destination().as_str(), "1@gmail.com");
        assert_eq!(controller.seconds_remaining(), 60);

        controller.set_digit(0, "4821").unwrap();
        assert!(controller.verify().is_ok());
    }

    #[test]
    fn invalid_fields_issue_nothing() {
        let issuer = Arc::new(QueuedIssuer::new(["4821"]));
        let err = start(issuer.clone(), "", "12").unwrap_err();
        match err {
            RecoveryError::Invalid(errors) => assert_eq!(
                errors,
                vec![FieldError::EmailRequired, FieldError::PhoneInvalid]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(issuer.issued(), 0);
    }

    #[test]
    fn unknown_account_issues_nothing() {
        let issuer = Arc::new(QueuedIssuer::new(["4821"]));
        let err = start(issuer.clone(), "2@gmail.com", "1111111111").unwrap_err();
        assert!(matches!(err, RecoveryError::AccountNotFound));
        assert_eq!(issuer.issued(), 0);
    }

    #[test]
    fn delivery_failure_is_reported() {
        let err = start(Arc::new(FailingIssuer), "1@gmail.com", "1111111111").unwrap_err();
        assert!(matches!(err, RecoveryError::Otp(OtpError::Delivery(_))));
    }

    #[test]
    fn invalid_error_lists_messages() {
        let err = RecoveryError::Invalid(vec![FieldError::EmailInvalid, FieldError::PhoneRequired]);
        assert_eq!(
            err.to_string(),
            "invalid recovery request: Please enter a valid email, Phone number is required"
        );
    }
}
