use crate::cli::actions::{recover, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Recover(args) => recover::execute(args).await,
    }
}
