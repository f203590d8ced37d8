use std::io;

/// Failures loading or reading an INI-backed configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("failed to load {path}: {source}")]
    Load {
        /// The path that was attempted.
        path: String,
        /// The underlying I/O or parse failure.
        #[source]
        source: io::Error,
    },

    /// The configuration has no sections at all, so there are no rigs to
    /// bring up.
    #[error("no sections found in configuration")]
    Empty,
}
