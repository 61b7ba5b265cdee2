//! OTP entry controller.
//!
//! Owns the entered digits, the issued code, the resend countdown and the
//! verification outcome. All mutations arrive as discrete events (keystroke,
//! backspace, tick, resend, verify); the controller never blocks.
//!
//! Phases: `Entering` until a verification succeeds, then `Verified`. A rejected
//! verification leaves the controller in `Entering` with every digit kept. Once
//! `Verified`, every further event fails with `OtpError::InvalidState`, so the
//! navigator hears about the success exactly once.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use ulid::Ulid;

use super::{
    config::OtpConfig,
    countdown::Countdown,
    delivery::{CodeIssuer, Destination},
    digits::{DigitSlots, SLOT_COUNT},
    error::OtpError,
    navigation::Navigator,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Entering,
    Verified,
}

/// Token for an in-flight resend; only the latest one may install a code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResendTicket {
    sequence: u64,
}

/// Presentation view of the controller. Never contains the issued code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OtpSnapshot {
    pub digits: [String; SLOT_COUNT],
    pub focus_index: usize,
    pub seconds_remaining: u32,
    pub resend_enabled: bool,
    pub phase: Phase,
}

impl fmt::Display for OtpSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, digit) in self.digits.iter().enumerate() {
            let value = if digit.is_empty() { "_" } else { digit.as_str() };
            if index == self.focus_index {
                write!(f, "[{value}]")?;
            } else {
                write!(f, " {value} ")?;
            }
        }
        match self.phase {
            Phase::Verified => write!(f, "  verified"),
            Phase::Entering if self.resend_enabled => write!(f, "  resend available"),
            Phase::Entering => write!(f, "  resend in {}s", self.seconds_remaining),
        }
    }
}

pub struct OtpController {
    session_id: Ulid,
    destination: Destination,
    digits: DigitSlots,
    expected_code: SecretString,
    countdown: Countdown,
    phase: Phase,
    failed_attempts: u32,
    resend_sequence: u64,
    issuer: Arc<dyn CodeIssuer>,
    navigator: Arc<dyn Navigator>,
}

impl OtpController {
    /// Enter the screen: issue the first code and start the cooldown.
    ///
    /// # Errors
    /// Returns `OtpError::Delivery` if the issuer cannot provide a code.
    pub fn new(
        destination: Destination,
        issuer: Arc<dyn CodeIssuer>,
        navigator: Arc<dyn Navigator>,
        config: &OtpConfig,
    ) -> Result<Self, OtpError> {
        let code = issuer
            .issue_code(&destination)
            .map_err(OtpError::Delivery)?;
        Ok(Self::with_code(destination, code, issuer, navigator, config))
    }

    /// Enter the screen with a code that was already issued for `destination`.
    #[must_use]
    pub fn with_code(
        destination: Destination,
        code: SecretString,
        issuer: Arc<dyn CodeIssuer>,
        navigator: Arc<dyn Navigator>,
        config: &OtpConfig,
    ) -> Self {
        let config = config.normalize();
        let controller = Self {
            session_id: Ulid::new(),
            destination,
            digits: DigitSlots::new(),
            expected_code: code,
            countdown: Countdown::new(config.resend_cooldown_seconds()),
            phase: Phase::Entering,
            failed_attempts: 0,
            resend_sequence: 0,
            issuer,
            navigator,
        };
        info!(
            session_id = %controller.session_id,
            destination = %controller.destination,
            cooldown = config.resend_cooldown_seconds(),
            "otp entry started"
        );
        controller
    }

    /// Input-change event for slot `index` (keystroke, paste or clear).
    ///
    /// # Errors
    /// Returns `OtpError::SlotOutOfRange` for an invalid slot and
    /// `OtpError::InvalidState` once verified.
    #[instrument(skip(self, raw), fields(session_id = %self.session_id))]
    pub fn set_digit(&mut self, index: usize, raw: &str) -> Result<(), OtpError> {
        self.ensure_entering()?;
        self.digits.set(index, raw)?;
        debug!(
            filled = self.digits.filled(),
            focus = self.digits.focus(),
            "digit input"
        );
        Ok(())
    }

    /// Backspace key on slot `index`.
    ///
    /// # Errors
    /// Returns `OtpError::SlotOutOfRange` for an invalid slot and
    /// `OtpError::InvalidState` once verified.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn handle_backspace(&mut self, index: usize) -> Result<(), OtpError> {
        self.ensure_entering()?;
        self.digits.backspace(index)?;
        debug!(focus = self.digits.focus(), "backspace");
        Ok(())
    }

    /// One second elapsed. Returns the seconds left on the resend gate.
    pub fn tick(&mut self) -> u32 {
        if self.phase == Phase::Entering && self.countdown.tick() {
            info!(session_id = %self.session_id, "resend enabled");
        }
        self.countdown.remaining()
    }

    /// Request a new code from the issuer and restart the cooldown.
    /// Digits already entered are kept.
    ///
    /// # Errors
    /// Returns `OtpError::InvalidState` while the cooldown is running or once
    /// verified, and `OtpError::Delivery` if the issuer fails. State is left
    /// untouched in both cases.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn resend(&mut self) -> Result<(), OtpError> {
        self.check_resend_allowed()?;
        let code = self
            .issuer
            .issue_code(&self.destination)
            .map_err(|err| {
                warn!("code delivery failed: {err}");
                OtpError::Delivery(err)
            })?;
        let ticket = self.begin_resend()?;
        self.complete_resend(ticket, code);
        Ok(())
    }

    /// Close the resend gate and hand out a ticket for a code delivered later.
    ///
    /// # Errors
    /// Returns `OtpError::InvalidState` while the cooldown is running or once verified.
    pub fn begin_resend(&mut self) -> Result<ResendTicket, OtpError> {
        self.check_resend_allowed()?;
        self.resend_sequence += 1;
        self.countdown.restart();
        info!(
            session_id = %self.session_id,
            sequence = self.resend_sequence,
            "resend requested"
        );
        Ok(ResendTicket {
            sequence: self.resend_sequence,
        })
    }

    /// Install a code delivered for `ticket`. Codes for superseded tickets are
    /// dropped; returns whether the code was installed.
    pub fn complete_resend(&mut self, ticket: ResendTicket, code: SecretString) -> bool {
        if self.phase != Phase::Entering || ticket.sequence != self.resend_sequence {
            debug!(
                session_id = %self.session_id,
                sequence = ticket.sequence,
                latest = self.resend_sequence,
                "discarding stale code"
            );
            return false;
        }
        self.expected_code = code;
        true
    }

    /// Compare the entered digits with the issued code.
    ///
    /// # Errors
    /// Returns `OtpError::IncompleteInput` when a slot is empty,
    /// `OtpError::CodeMismatch` when the code differs (digits are kept), and
    /// `OtpError::InvalidState` once verified.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn verify(&mut self) -> Result<(), OtpError> {
        self.ensure_entering()?;

        let Some(entered) = self.digits.joined() else {
            debug!(filled = self.digits.filled(), "incomplete input");
            return Err(OtpError::IncompleteInput);
        };

        if entered != self.expected_code.expose_secret() {
            self.failed_attempts = self.failed_attempts.saturating_add(1);
            warn!(failed_attempts = self.failed_attempts, "code mismatch");
            return Err(OtpError::CodeMismatch);
        }

        self.phase = Phase::Verified;
        info!(destination = %self.destination, "code verified");
        self.navigator.on_verified(&self.destination);
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> OtpSnapshot {
        OtpSnapshot {
            digits: self.digits.values(),
            focus_index: self.digits.focus(),
            seconds_remaining: self.countdown.remaining(),
            resend_enabled: self.resend_enabled(),
            phase: self.phase,
        }
    }

    #[must_use]
    pub fn digits(&self) -> &DigitSlots {
        &self.digits
    }

    #[must_use]
    pub fn focus_index(&self) -> usize {
        self.digits.focus()
    }

    #[must_use]
    pub fn seconds_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn resend_enabled(&self) -> bool {
        self.countdown.is_expired()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    #[must_use]
    pub fn session_id(&self) -> Ulid {
        self.session_id
    }

    fn ensure_entering(&self) -> Result<(), OtpError> {
        match self.phase {
            Phase::Entering => Ok(()),
            Phase::Verified => Err(OtpError::InvalidState),
        }
    }

    fn check_resend_allowed(&self) -> Result<(), OtpError> {
        self.ensure_entering()?;
        if !self.resend_enabled() {
            warn!(
                session_id = %self.session_id,
                seconds_remaining = self.countdown.remaining(),
                "resend requested while gate is closed"
            );
            return Err(OtpError::InvalidState);
        }
        Ok(())
    }
}

impl fmt::Debug for OtpController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpController")
            .field("session_id", &self.session_id)
            .field("destination", &self.destination)
            .field("digits", &self.digits)
            .field("countdown", &self.countdown)
            .field("phase", &self.phase)
            .field("failed_attempts", &self.failed_attempts)
            .finish_non_exhaustive()
    }
}
