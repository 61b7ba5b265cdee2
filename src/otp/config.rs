use std::time::Duration;

pub const DEFAULT_RESEND_COOLDOWN_SECONDS: u32 = 60;
pub const MAX_RESEND_COOLDOWN_SECONDS: u32 = 60;
const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug)]
pub struct OtpConfig {
    resend_cooldown_seconds: u32,
    tick_period: Duration,
}

impl OtpConfig {
    /// Default config: 60s resend cooldown counted down once per second.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resend_cooldown_seconds: DEFAULT_RESEND_COOLDOWN_SECONDS,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }

    #[must_use]
    pub fn with_resend_cooldown_seconds(mut self, seconds: u32) -> Self {
        self.resend_cooldown_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Clamp the cooldown into `1..=60` seconds and reject a zero tick period.
    #[must_use]
    pub fn normalize(self) -> Self {
        let resend_cooldown_seconds = self
            .resend_cooldown_seconds
            .clamp(1, MAX_RESEND_COOLDOWN_SECONDS);
        let tick_period = if self.tick_period.is_zero() {
            DEFAULT_TICK_PERIOD
        } else {
            self.tick_period
        };
        Self {
            resend_cooldown_seconds,
            tick_period,
        }
    }

    #[must_use]
    pub fn resend_cooldown_seconds(&self) -> u32 {
        self.resend_cooldown_seconds
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self::new()
    }
}
