use std::io;

/// Failures that can prevent the daemon from starting or keep a rig from
/// coming up, as distinct from the per-command [`rig_core::RigError`]s a
/// client sees on the wire.
///
/// Nothing here terminates an already-running connection; a bad command
/// from one client is a wire-level `RPRT -1`, never a `DaemonError`.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// The configuration file could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] rig_config::ConfigError),

    /// A rig section named a model this daemon has no initializer for.
    #[error("{section}: unknown rig model {model:?}")]
    UnknownModel {
        /// The offending configuration section.
        section: String,
        /// The unrecognized `rig` key value.
        model: String,
    },

    /// A known model's initializer failed (the transport could not be
    /// opened, or the I/O handle could not be started).
    #[error("{section}: rig failed to initialize: {source}")]
    RigInitFailed {
        /// The offending configuration section.
        section: String,
        /// The underlying driver failure.
        #[source]
        source: rig_core::RigError,
    },

    /// `rigctld_address`/`rigctld_port` did not resolve to any bindable
    /// address, or every resolved family failed to bind.
    #[error("{section}: no rigctld listener could be bound")]
    NoListenerBound {
        /// The offending configuration section.
        section: String,
    },

    /// No rig in the configuration produced a usable listener; the
    /// process has nothing left to serve.
    #[error("no rig produced an active listener")]
    NoActiveRigs,

    /// The event loop's polling primitive failed.
    #[error("event loop error: {0}")]
    Io(#[from] io::Error),
}
