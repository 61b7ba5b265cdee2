pub mod config;
pub mod controller;
pub mod countdown;
pub mod delivery;
pub mod digits;
pub mod error;
pub mod navigation;
pub mod session;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

pub use config::OtpConfig;
pub use controller::{OtpController, OtpSnapshot, Phase, ResendTicket};
pub use delivery::{CodeIssuer, Destination, LogCodeIssuer, RandomCodeIssuer};
pub use error::OtpError;
pub use navigation::{LogNavigator, Navigator};
pub use session::OtpSession;
