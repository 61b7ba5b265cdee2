//! Interactive recovery session on a terminal.
//!
//! One command per input line drives an `OtpSession`; countdown ticks arrive on
//! the same loop, so events are always handled one at a time. Once the code is
//! verified the user picks a new password.

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::info;

use crate::otp::{
    delivery::generate_code, CodeIssuer, Destination, LogNavigator, OtpConfig, OtpError,
    OtpSession, OtpSnapshot, Phase,
};
use crate::recovery::{start_recovery, validate_password_change, AccountRecord, StaticAccountDirectory};

const HELP: &str = "commands: <digits> | set <slot> <value> | clear <slot> | back | verify | resend | show | quit";

#[derive(Debug)]
pub struct Args {
    pub email: String,
    pub phone: String,
    pub accounts: Vec<AccountRecord>,
    pub resend_cooldown_seconds: u32,
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Abandoned,
    PasswordChanged,
}

/// Delivers codes by printing them on stderr.
#[derive(Clone, Debug, Default)]
pub struct TerminalCodeIssuer;

impl CodeIssuer for TerminalCodeIssuer {
    fn issue_code(&self, destination: &Destination) -> Result<SecretString> {
        let code = generate_code();
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "code sent to {destination}: {}", code.expose_secret())?;
        Ok(code)
    }
}

/// A line typed during code entry. Slots are numbered from 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Digits typed at the focused slot; more than one is a paste.
    Type(String),
    Set { index: usize, value: String },
    Clear(usize),
    Back,
    Verify,
    Resend,
    Show,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Ok(Self::Show);
        };

        if word.chars().all(|c| c.is_ascii_digit()) {
            return match parts.next() {
                None => Ok(Self::Type(word.to_string())),
                Some(_) => Err(format!("unexpected input '{}'", line.trim())),
            };
        }

        let slot = |part: Option<&str>| -> Result<usize, String> {
            part.ok_or_else(|| format!("'{word}' needs a slot number"))?
                .parse::<usize>()
                .map_err(|_| format!("invalid slot number in '{}'", line.trim()))
        };

        let command = match word.to_lowercase().as_str() {
            "set" => {
                let index = slot(parts.next())?;
                let value = parts
                    .next()
                    .ok_or_else(|| "'set' needs a value".to_string())?;
                Self::Set {
                    index,
                    value: value.to_string(),
                }
            }
            "clear" => Self::Clear(slot(parts.next())?),
            "back" => Self::Back,
            "verify" => Self::Verify,
            "resend" => Self::Resend,
            "show" => Self::Show,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(format!("unknown command '{word}', type 'help'")),
        };

        if parts.next().is_some() {
            return Err(format!("too many arguments in '{}'", line.trim()));
        }
        Ok(command)
    }
}

/// Execute the recovery action on stdin and stdout.
/// # Errors
/// Returns an error if the request is rejected or the terminal fails.
pub async fn execute(args: Args) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let outcome = run(args, Arc::new(TerminalCodeIssuer), input, std::io::stdout()).await?;
    info!(?outcome, "recovery session finished");
    Ok(())
}

/// Run a recovery session reading commands from `input`.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
/// Returns an error if recovery cannot start, or reading or writing fails.
pub async fn run<R, W>(
    args: Args,
    issuer: Arc<dyn CodeIssuer>,
    input: R,
    mut output: W,
) -> Result<Outcome>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Args {
        email,
        phone,
        accounts,
        resend_cooldown_seconds,
        json,
    } = args;

    let config = OtpConfig::new()
        .with_resend_cooldown_seconds(resend_cooldown_seconds)
        .normalize();
    let directory = StaticAccountDirectory::new(accounts);
    let controller = start_recovery(
        &directory,
        issuer,
        Arc::new(LogNavigator),
        &config,
        &email,
        &phone,
    )?;

    let mut session = OtpSession::start(controller, &config);
    let mut lines = input.lines();

    say(
        &mut output,
        json,
        &format!(
            "Enter the 4-digit code sent to {}",
            session.controller().destination()
        ),
    )?;
    render(&mut output, &session.snapshot(), json)?;

    loop {
        tokio::select! {
            Some(remaining) = session.next_tick(), if session.timer_running() => {
                if remaining == 0 {
                    render(&mut output, &session.snapshot(), json)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(Outcome::Abandoned);
                };
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => return Ok(Outcome::Abandoned),
                    Ok(SessionCommand::Help) => say(&mut output, json, HELP)?,
                    Ok(command) => {
                        if let Err(err) = apply(&mut session, command) {
                            say(&mut output, json, err.user_message())?;
                        }
                        if session.controller().phase() == Phase::Verified {
                            say(&mut output, json, "OTP verified")?;
                            break;
                        }
                        render(&mut output, &session.snapshot(), json)?;
                    }
                    Err(message) => say(&mut output, json, &message)?,
                }
            }
        }
    }

    change_password(&mut lines, &mut output, json).await
}

/// Apply one command to the session.
///
/// # Errors
/// Returns the controller error for the rejected event.
pub fn apply(session: &mut OtpSession, command: SessionCommand) -> Result<(), OtpError> {
    match command {
        SessionCommand::Type(value) => {
            let focus = session.controller().focus_index();
            session.set_digit(focus, &value)
        }
        SessionCommand::Set { index, value } => session.set_digit(index, &value),
        SessionCommand::Clear(index) => session.set_digit(index, ""),
        SessionCommand::Back => {
            // A backspace on a filled slot deletes its digit, on an empty one it hops left.
            let focus = session.controller().focus_index();
            if session.controller().digits().get(focus).is_some() {
                session.set_digit(focus, "")
            } else {
                session.handle_backspace(focus)
            }
        }
        SessionCommand::Verify => session.verify(),
        SessionCommand::Resend => session.resend(),
        SessionCommand::Show | SessionCommand::Help | SessionCommand::Quit => Ok(()),
    }
}

async fn change_password<R, W>(lines: &mut Lines<R>, output: &mut W, json: bool) -> Result<Outcome>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    say(output, json, "Enter the new password and its confirmation")?;

    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        let (Some(new_password), Some(confirmation), None) =
            (parts.next(), parts.next(), parts.next())
        else {
            say(
                output,
                json,
                "Enter the new password and its confirmation separated by a space",
            )?;
            continue;
        };

        let new_password = SecretString::from(new_password.to_string());
        let confirmation = SecretString::from(confirmation.to_string());
        match validate_password_change(&new_password, &confirmation) {
            Ok(()) => {
                info!("password changed");
                say(output, json, "Password changed successfully")?;
                return Ok(Outcome::PasswordChanged);
            }
            Err(err) => say(output, json, &err.to_string())?,
        }
    }

    Ok(Outcome::Abandoned)
}

fn render<W: Write>(output: &mut W, snapshot: &OtpSnapshot, json: bool) -> Result<()> {
    if json {
        writeln!(output, "{}", serde_json::to_string(snapshot)?)?;
    } else {
        writeln!(output, "{snapshot}")?;
    }
    Ok(())
}

fn say<W: Write>(output: &mut W, json: bool, message: &str) -> Result<()> {
    if json {
        writeln!(output, "{}", serde_json::json!({ "message": message }))?;
    } else {
        writeln!(output, "{message}")?;
    }
    Ok(())
}
