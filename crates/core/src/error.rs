use std::io;

/// The error taxonomy every layer above the transport maps its failures
/// onto: a small set of *kinds*, not call sites.
///
/// Each variant carries exactly the context its callers need to build a
/// diagnostic or a wire-level reply; none of them is meant to be matched
/// on by application code beyond [`RigError::errno`].
#[derive(Debug, thiserror::Error)]
pub enum RigError {
    /// A null handle, a malformed parse, or an unsupported mode/VFO name
    /// was supplied by the caller.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The driver has no implementation for this operation, or the
    /// model's capability bitmask masks it out.
    #[error("operation not supported")]
    Unsupported,

    /// The serial link failed or timed out.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// A reply did not match the expected mnemonic or column count.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The rig refused the operation for a policy reason (e.g. writing
    /// frequency while in MEMORY or COM function).
    #[error("permission denied")]
    Permission,

    /// The rig could not be brought up at all; it should be dropped
    /// rather than retried.
    #[error("fatal: {0}")]
    Fatal(String),
}

impl RigError {
    /// The POSIX errno this error should be reported as on the wire.
    ///
    /// The TCP front end negates this value when building an `RPRT`
    /// line, per the wire protocol's convention that acknowledgement
    /// failures are negative.
    #[must_use]
    pub fn errno(&self) -> i32 {
        match self {
            Self::Argument(_) => libc_einval(),
            Self::Unsupported => libc_enotsup(),
            Self::Transport(_) | Self::Protocol(_) => libc_eio(),
            Self::Permission => libc_eacces(),
            Self::Fatal(_) => libc_eio(),
        }
    }
}

// These mirror the platform's libc constants without introducing a
// dependency on `libc` into a crate that otherwise has none; the values
// are stable across every target this project runs on (Linux, macOS,
// the BSDs).
const fn libc_einval() -> i32 {
    22
}
const fn libc_eacces() -> i32 {
    13
}
const fn libc_eio() -> i32 {
    5
}
const fn libc_enotsup() -> i32 {
    95
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_values_match_posix() {
        assert_eq!(RigError::Argument("x".into()).errno(), 22);
        assert_eq!(RigError::Permission.errno(), 13);
        assert_eq!(RigError::Unsupported.errno(), 95);
        assert_eq!(
            RigError::Transport(io::Error::other("boom")).errno(),
            5
        );
    }
}
