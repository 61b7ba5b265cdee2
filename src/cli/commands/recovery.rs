use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::otp::config::{DEFAULT_RESEND_COOLDOWN_SECONDS, MAX_RESEND_COOLDOWN_SECONDS};
use crate::recovery::AccountRecord;

pub const ARG_EMAIL: &str = "email";
pub const ARG_PHONE: &str = "phone";
pub const ARG_ACCOUNT: &str = "account";
pub const ARG_RESEND_COOLDOWN_SECONDS: &str = "resend-cooldown-seconds";
pub const ARG_JSON: &str = "json";

#[derive(Debug)]
pub struct Options {
    pub email: String,
    pub phone: String,
    pub accounts: Vec<AccountRecord>,
    pub resend_cooldown_seconds: u32,
    pub json: bool,
}

impl Options {
    /// Parse recovery arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_required = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        let accounts: Vec<AccountRecord> = matches
            .get_many::<AccountRecord>(ARG_ACCOUNT)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        if accounts.is_empty() {
            anyhow::bail!("missing required argument: --{ARG_ACCOUNT}");
        }

        Ok(Self {
            email: read_required(ARG_EMAIL)?,
            phone: read_required(ARG_PHONE)?,
            accounts,
            resend_cooldown_seconds: matches
                .get_one::<u32>(ARG_RESEND_COOLDOWN_SECONDS)
                .copied()
                .unwrap_or(DEFAULT_RESEND_COOLDOWN_SECONDS),
            json: matches.get_flag(ARG_JSON),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_EMAIL)
                .short('e')
                .long(ARG_EMAIL)
                .help("Email address of the account to recover")
                .env("OTPGATE_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PHONE)
                .short('p')
                .long(ARG_PHONE)
                .help("10-digit phone number of the account to recover")
                .env("OTPGATE_PHONE")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ACCOUNT)
                .short('a')
                .long(ARG_ACCOUNT)
                .help("Known account as EMAIL:PHONE, repeat or comma separate for more")
                .env("OTPGATE_ACCOUNTS")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(AccountRecord))
                .required(true),
        )
        .arg(
            Arg::new(ARG_RESEND_COOLDOWN_SECONDS)
                .long(ARG_RESEND_COOLDOWN_SECONDS)
                .help("Seconds before a new code can be requested")
                .env("OTPGATE_RESEND_COOLDOWN_SECONDS")
                .default_value("60")
                .value_parser(
                    clap::value_parser!(u32).range(1..=i64::from(MAX_RESEND_COOLDOWN_SECONDS)),
                ),
        )
        .arg(
            Arg::new(ARG_JSON)
                .long(ARG_JSON)
                .help("Print the entry state as JSON")
                .env("OTPGATE_JSON")
                .action(ArgAction::SetTrue),
        )
}
