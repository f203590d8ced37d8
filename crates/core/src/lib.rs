//! # Overview
//!
//! Shared data model for rig control: the mode and VFO bitmasks every
//! driver speaks in terms of, and the error taxonomy that every layer
//! above the transport maps its failures onto.
//!
//! # Design
//!
//! Modes and VFOs are disjoint single-bit values so that a "supported"
//! set is just a bitwise-OR of the members a given rig implements, and
//! membership is a single `&` test. [`RigError`] is deliberately small:
//! it names *kinds* of failure, not call sites, because every caller
//! above this crate (the Kenwood engine, the TCP dispatcher) needs to
//! map it onto either a POSIX errno or a wire-level `RPRT` line.
//!
//! # Invariants
//!
//! - [`RigMode::UNKNOWN`] and [`Vfo::UNKNOWN`] are always `0`; they are
//!   the result of a failed read, never a member of any supported-set.
//! - Every other variant of [`RigMode`] and [`Vfo`] occupies exactly one
//!   bit, so a `u32` bitmask round-trips through repeated OR without
//!   collision.
//!
//! # Errors
//!
//! See [`RigError`].
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod mode;
mod vfo;

pub use error::RigError;
pub use mode::RigMode;
pub use vfo::Vfo;
