use tracing::info;

use super::delivery::Destination;

/// Receives the hand-off once a code has been verified.
pub trait Navigator: Send + Sync {
    fn on_verified(&self, destination: &Destination);
}

/// Navigator that only records the hand-off in the logs.
#[derive(Clone, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn on_verified(&self, destination: &Destination) {
        info!(destination = %destination, "verified, continuing to password reset");
    }
}
