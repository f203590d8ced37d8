//! Test-only helpers shared by this crate's `#[cfg(test)]` modules.
//!
//! Builds a [`Rig`] over a transport that never produces traffic, so
//! every capability-gated call fails with [`rig_core::RigError::Unsupported`]
//! unless the test explicitly grants that capability. Mirrors the
//! `NullTransport`/`NullFramer`/`NullSink` triple `rig_kenwood::rig`'s own
//! tests use.

#![cfg(test)]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use rig_core::{RigMode, Vfo};
use rig_io_handle::{AsyncSink, Framer, IoHandle, IoResponse};
use rig_kenwood::{Capabilities, CommandId, KenwoodHfSession, Rig};
use rig_transport::Transport;
use rustc_hash::FxHashSet;

struct NullTransport;
impl Transport for NullTransport {
    fn write(&mut self, buf: &[u8], _timeout: Duration) -> io::Result<usize> {
        Ok(buf.len())
    }
    fn wait_write(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(true)
    }
    fn read(&mut self, _buf: &mut [u8], _timeout: Duration) -> io::Result<usize> {
        Ok(0)
    }
    fn wait_read(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(true)
    }
    fn pending(&self) -> io::Result<usize> {
        Ok(0)
    }
    fn try_clone(&self) -> io::Result<Box<dyn Transport>> {
        Ok(Box::new(NullTransport))
    }
}

struct NullFramer;
impl Framer for NullFramer {
    fn next_response(&mut self, _transport: &mut dyn Transport) -> Option<IoResponse> {
        None
    }
}

struct NullSink;
impl AsyncSink for NullSink {
    fn deliver(&self, _response: IoResponse) {}
}

/// A rig with no capabilities wired up: every operation returns
/// `RigError::Unsupported`, which the dispatcher reports as `RPRT -1`.
pub fn bare_rig() -> Rig {
    rig_with_capabilities(Capabilities::empty())
}

pub fn rig_with_capabilities(capabilities: Capabilities) -> Rig {
    let handle = IoHandle::start(Box::new(NullTransport), Box::new(NullFramer), Arc::new(NullSink))
        .expect("null transport always clones");
    let session = KenwoodHfSession::new(
        handle,
        FxHashSet::from_iter([CommandId::If]),
        FxHashSet::from_iter([CommandId::If]),
        Duration::from_millis(10),
    );
    Rig::KenwoodHf {
        session,
        supported_modes: RigMode::Usb.bits() | RigMode::Lsb.bits(),
        supported_vfos: Vfo::A.bits() | Vfo::B.bits() | Vfo::Memory.bits(),
        capabilities,
    }
}
