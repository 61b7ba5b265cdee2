use anyhow::Result;
use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Build the log filter: `RUST_LOG` wins, otherwise the verbosity level.
///
/// # Errors
///
/// Returns an error if a directive cannot be parsed
pub fn filter(verbosity_level: Option<Level>) -> Result<EnvFilter> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    Ok(EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("tokio=error".parse()?))
}

/// Initialize logging.
///
/// Logs go to stderr so stdout only carries the session output. With `json`
/// set every event is written as one JSON object per line.
///
/// # Errors
///
/// Returns an error if the filter or the global subscriber cannot be set
pub fn init(verbosity_level: Option<Level>, json: bool) -> Result<()> {
    let fmt_layer = if json {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .json()
            .boxed()
    } else {
        fmt::layer()
            .with_writer(io::stderr)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(false)
            .pretty()
            .boxed()
    };

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(filter(verbosity_level)?);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    fn hint(filter: &EnvFilter) -> Option<LevelFilter> {
        <EnvFilter as Layer<Registry>>::max_level_hint(filter)
    }

    #[test]
    fn filter_defaults_to_error() {
        temp_env::with_var("RUST_LOG", None::<&str>, || {
            let filter = filter(None).unwrap();
            assert_eq!(hint(&filter), Some(LevelFilter::ERROR));
        });
    }

    #[test]
    fn filter_uses_verbosity() {
        temp_env::with_var("RUST_LOG", None::<&str>, || {
            let filter = filter(Some(Level::DEBUG)).unwrap();
            assert_eq!(hint(&filter), Some(LevelFilter::DEBUG));
        });
    }

    #[test]
    fn rust_log_overrides_verbosity() {
        temp_env::with_var("RUST_LOG", Some("trace"), || {
            let filter = filter(Some(Level::WARN)).unwrap();
            assert_eq!(hint(&filter), Some(LevelFilter::TRACE));
        });
    }
}
