//! Map validated CLI matches to the action to run.

use crate::cli::actions::{recover::Args, Action};
use crate::cli::commands::recovery;
use anyhow::Result;

/// Map validated CLI matches to a recovery action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let options = recovery::Options::parse(matches)?;

    Ok(Action::Recover(Args {
        email: options.email,
        phone: options.phone,
        accounts: options.accounts,
        resend_cooldown_seconds: options.resend_cooldown_seconds,
        json: options.json,
    }))
}
