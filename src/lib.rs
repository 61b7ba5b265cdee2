//! # otpgate (account recovery code entry)
//!
//! `otpgate` drives the one-time code step of an account recovery flow:
//!
//! - **Recovery request:** an email and a 10-digit phone number are validated and
//!   matched against an account directory before any code is issued.
//! - **Code entry:** a 4-slot input with single-key entry, paste distribution and
//!   backspace navigation. Focus is exposed as state for the presentation layer.
//! - **Resend gate:** a new code can only be requested once the cooldown
//!   (60 seconds by default) has elapsed. The countdown is driven by a timer task
//!   owned by the session and aborted when the session goes away.
//! - **Verification:** the entered digits are compared with the issued code. A
//!   match hands off to the navigator exactly once; a mismatch keeps the digits so
//!   they can be corrected. There is no lockout.
//!
//! The issued code is kept in a `SecretString` and never written to logs by the
//! controller.

pub mod cli;
pub mod otp;
pub mod recovery;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
