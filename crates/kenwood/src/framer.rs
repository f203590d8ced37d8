use std::time::Duration;

use rig_io_handle::{Framer, IoResponse};
use rig_transport::Transport;

/// Frames Kenwood-HF replies: waits up to `response_timeout` for the
/// first byte, then reads one byte at a time (up to `char_timeout` each)
/// until a `;` terminator is seen.
///
/// Grounded directly in the original driver's `kenwood_hf_read_response`:
/// a single `io_wait_read` for the first byte, then a byte-at-a-time
/// `io_read` loop terminated by `;`.
pub struct KenwoodFramer {
    response_timeout: Duration,
    char_timeout: Duration,
}

impl KenwoodFramer {
    /// Builds a framer with the session's configured timeouts.
    #[must_use]
    pub const fn new(response_timeout: Duration, char_timeout: Duration) -> Self {
        Self {
            response_timeout,
            char_timeout,
        }
    }
}

impl Framer for KenwoodFramer {
    fn next_response(&mut self, transport: &mut dyn Transport) -> Option<IoResponse> {
        match transport.wait_read(self.response_timeout) {
            Ok(true) => {}
            _ => return None,
        }

        let mut bytes = Vec::with_capacity(32);
        let mut byte = [0u8; 1];
        loop {
            match transport.read(&mut byte, self.char_timeout) {
                Ok(1) => {
                    bytes.push(byte[0]);
                    if byte[0] == b';' {
                        return Some(IoResponse::new(bytes));
                    }
                }
                _ => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct ScriptedTransport {
        readable: bool,
        chunks: std::collections::VecDeque<u8>,
    }

    impl Transport for ScriptedTransport {
        fn write(&mut self, buf: &[u8], _timeout: Duration) -> io::Result<usize> {
            Ok(buf.len())
        }
        fn wait_write(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(true)
        }
        fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> io::Result<usize> {
            match self.chunks.pop_front() {
                Some(b) => {
                    buf[0] = b;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
        fn wait_read(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(self.readable)
        }
        fn pending(&self) -> io::Result<usize> {
            Ok(self.chunks.len())
        }
        fn try_clone(&self) -> io::Result<Box<dyn Transport>> {
            unimplemented!("not exercised by these tests")
        }
    }

    #[test]
    fn reads_until_semicolon() {
        let mut framer = KenwoodFramer::new(Duration::from_millis(10), Duration::from_millis(10));
        let mut transport = ScriptedTransport {
            readable: true,
            chunks: b"FA00014250000;".iter().copied().collect(),
        };
        let resp = framer.next_response(&mut transport).expect("response");
        assert_eq!(resp.bytes(), b"FA00014250000;");
    }

    #[test]
    fn timeout_before_first_byte_yields_none() {
        let mut framer = KenwoodFramer::new(Duration::from_millis(10), Duration::from_millis(10));
        let mut transport = ScriptedTransport {
            readable: false,
            chunks: std::collections::VecDeque::new(),
        };
        assert!(framer.next_response(&mut transport).is_none());
    }

    #[test]
    fn mid_frame_read_failure_yields_none() {
        let mut framer = KenwoodFramer::new(Duration::from_millis(10), Duration::from_millis(10));
        let mut transport = ScriptedTransport {
            readable: true,
            chunks: b"FA000".iter().copied().collect(),
        };
        assert!(framer.next_response(&mut transport).is_none());
    }
}
