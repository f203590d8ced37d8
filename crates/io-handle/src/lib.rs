//! # Overview
//!
//! The per-rig background reader: demultiplexes a half-duplex serial
//! link into replies awaited synchronously by the Kenwood engine and
//! unsolicited messages delivered to an async sink.
//!
//! # Design
//!
//! The rendezvous between the reader thread and a synchronous waiter is
//! an explicit state machine (see [`handle`]'s `HandoffState`) guarded by
//! one [`std::sync::Mutex`] and one [`std::sync::Condvar`], replacing a
//! two-semaphore handoff. The invariants: at most one synchronous waiter
//! at a time, every reader-produced message delivered exactly once, and
//! the reader never touches the shared slot again until the waiter has
//! acknowledged the previous one.
//!
//! # Invariants
//!
//! See [`IoHandle::get_response`].
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod handle;
mod response;

pub use handle::{AsyncSink, Framer, IoHandle};
pub use response::IoResponse;
