use rig_io_handle::{AsyncSink, IoResponse};

/// Delivers unsolicited (AI-mode) rig messages.
///
/// The original driver's `kenwood_hf_handle_extra` is a documented no-op
/// ("any lock may be held, so MUST NOT lock or post semaphores"); this
/// logs the frame at `trace` instead of silently discarding it, since a
/// structured-logging daemon should surface what the rig is volunteering
/// even if nothing here acts on it.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AsyncSink for TracingSink {
    fn deliver(&self, response: IoResponse) {
        tracing::trace!(frame = ?String::from_utf8_lossy(response.bytes()), "unsolicited rig message");
    }
}
