//! Logging setup for ticketdesk.
//!
//! Installs a `tracing` subscriber shared by the server and the CLI client.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress all output except errors.
    Quiet,
    /// Normal output level (info and above).
    #[default]
    Normal,
    /// Verbose output (debug and above).
    Verbose,
    /// Very verbose output (trace level).
    Trace,
}

impl Verbosity {
    /// Convert verbosity to a tracing level.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// The default filter directive for this verbosity.
    ///
    /// Request traces from `tower_http` follow the same level so `-v`
    /// shows one line per request.
    #[must_use]
    pub fn default_directive(&self) -> String {
        let level = self.to_level_filter();
        format!("ticketdesk={level},tower_http={level}")
    }
}

/// Initialize the logging system.
///
/// The level comes from `verbosity` unless `RUST_LOG` is set, in which case
/// `RUST_LOG` wins. Calling this more than once is harmless.
///
/// # Examples
///
/// ```no_run
/// use ticketdesk::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

/// Initialize logging for tests.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_to_level() {
        assert_eq!(Verbosity::Quiet.to_level_filter(), Level::ERROR);
        assert_eq!(Verbosity::Normal.to_level_filter(), Level::INFO);
        assert_eq!(Verbosity::Verbose.to_level_filter(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.to_level_filter(), Level::TRACE);
    }

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(
            Verbosity::Verbose.default_directive(),
            "ticketdesk=DEBUG,tower_http=DEBUG"
        );
        assert_eq!(
            Verbosity::Quiet.default_directive(),
            "ticketdesk=ERROR,tower_http=ERROR"
        );
    }

    #[test]
    fn test_default_directive_parses() {
        for verbosity in [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Trace,
        ] {
            assert!(EnvFilter::try_new(verbosity.default_directive()).is_ok());
        }
    }

    #[test]
    fn test_init_logging_with_all_verbosity_levels() {
        // Only the first call installs a subscriber
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Verbose);
        init_logging(Verbosity::Trace);
    }

    #[test]
    fn test_init_test_logging_does_not_panic() {
        init_test_logging();
    }
}
