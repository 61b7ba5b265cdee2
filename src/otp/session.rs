//! Controller paired with the timer that drives its countdown.

use tracing::debug;

use super::{
    config::OtpConfig,
    controller::{OtpController, OtpSnapshot, Phase},
    error::OtpError,
    timer::TickTimer,
};

/// Owns a controller and its tick timer for the lifetime of the screen.
///
/// The timer runs only while the resend gate is closed and the code has not
/// been verified; dropping the session aborts it.
#[derive(Debug)]
pub struct OtpSession {
    controller: OtpController,
    timer: Option<TickTimer>,
    config: OtpConfig,
}

impl OtpSession {
    /// Start the countdown for `controller`. Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(controller: OtpController, config: &OtpConfig) -> Self {
        let mut session = Self {
            controller,
            timer: None,
            config: config.normalize(),
        };
        session.restart_timer();
        session
    }

    /// Wait for the next tick and apply it. Returns the seconds left, or `None`
    /// when no timer is running.
    pub async fn next_tick(&mut self) -> Option<u32> {
        let timer = self.timer.as_mut()?;
        if !timer.tick().await {
            self.timer = None;
            return None;
        }

        let remaining = self.controller.tick();
        if remaining == 0 {
            debug!(session_id = %self.controller.session_id(), "countdown finished, stopping timer");
            self.timer = None;
        }
        Some(remaining)
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// # Errors
    /// See [`OtpController::set_digit`].
    pub fn set_digit(&mut self, index: usize, raw: &str) -> Result<(), OtpError> {
        self.controller.set_digit(index, raw)
    }

    /// # Errors
    /// See [`OtpController::handle_backspace`].
    pub fn handle_backspace(&mut self, index: usize) -> Result<(), OtpError> {
        self.controller.handle_backspace(index)
    }

    /// Resend the code and restart the countdown timer.
    ///
    /// # Errors
    /// See [`OtpController::resend`].
    pub fn resend(&mut self) -> Result<(), OtpError> {
        self.controller.resend()?;
        self.restart_timer();
        Ok(())
    }

    /// Verify the entered code; the timer is stopped once verified.
    ///
    /// # Errors
    /// See [`OtpController::verify`].
    pub fn verify(&mut self) -> Result<(), OtpError> {
        let result = self.controller.verify();
        if self.controller.phase() == Phase::Verified {
            self.timer = None;
        }
        result
    }

    #[must_use]
    pub fn controller(&self) -> &OtpController {
        &self.controller
    }

    #[must_use]
    pub fn snapshot(&self) -> OtpSnapshot {
        self.controller.snapshot()
    }

    /// Tear down the timer and hand back the controller.
    #[must_use]
    pub fn into_controller(mut self) -> OtpController {
        self.timer = None;
        let Self { controller, .. } = self;
        controller
    }

    fn restart_timer(&mut self) {
        // Replacing the timer drops, and aborts, the previous one.
        let remaining = self.controller.seconds_remaining();
        let period = self.config.tick_period();
        self.timer = (remaining > 0 && self.controller.phase() == Phase::Entering)
            .then(|| TickTimer::spawn(period, remaining));
    }
}
