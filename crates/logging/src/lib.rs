//! # Overview
//!
//! Bridges the CLI's repeatable `-v` flag to a [`tracing`] filter level,
//! and installs the process-wide subscriber.
//!
//! # Design
//!
//! The mapping is a plain verbosity count, the same convention this
//! project's CLI surface already uses elsewhere: `0` is the quiet
//! default (`warn`), each further `-v` steps one level down
//! (`info`, `debug`, `trace`), and anything past `trace` just stays at
//! `trace` rather than erroring.
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// A verbosity count in `-v` units, convertible to a [`tracing::Level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Wraps a raw `-v` count (clap's `ArgAction::Count` result).
    #[must_use]
    pub const fn from_count(count: u8) -> Self {
        Self(count)
    }

    /// The `tracing` level this verbosity count maps to.
    #[must_use]
    pub const fn level(self) -> Level {
        match self.0 {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Installs a `tracing-subscriber` formatter at `verbosity`'s level as
/// the global default.
///
/// Safe to call at most once per process; a second call is a no-op
/// (mirrors `tracing_subscriber`'s own "already set" behavior rather
/// than panicking, since a daemon re-reading its config should not
/// crash on a logging detail).
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.level().into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_zero_is_warn() {
        assert_eq!(Verbosity::from_count(0).level(), Level::WARN);
    }

    #[test]
    fn count_maps_monotonically_up_to_trace() {
        assert_eq!(Verbosity::from_count(1).level(), Level::INFO);
        assert_eq!(Verbosity::from_count(2).level(), Level::DEBUG);
        assert_eq!(Verbosity::from_count(3).level(), Level::TRACE);
    }

    #[test]
    fn excess_verbosity_stays_at_trace() {
        assert_eq!(Verbosity::from_count(255).level(), Level::TRACE);
    }
}
