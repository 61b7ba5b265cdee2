use thiserror::Error;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("fewer than 4 digits entered")]
    IncompleteInput,
    #[error("entered code does not match the issued code")]
    CodeMismatch,
    #[error("operation not permitted in the current state")]
    InvalidState,
    #[error("slot index {index} out of range")]
    SlotOutOfRange { index: usize },
    #[error("code delivery failed: {0}")]
    Delivery(#[source] anyhow::Error),
}

impl OtpError {
    /// Message shown to the user by the presentation layer.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::IncompleteInput => "Please enter all 4 digits of the OTP",
            Self::CodeMismatch => "The OTP you entered is incorrect",
            Self::InvalidState => "Please wait before requesting a new OTP",
            Self::SlotOutOfRange { .. } => "Invalid OTP field",
            Self::Delivery(_) => "We could not send a new OTP, please try again",
        }
    }
}
