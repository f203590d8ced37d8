//! Per-client connection state.
//!
//! A `slab::Slab<Connection>` replaces the original's intrusive
//! doubly-linked client list: accepting a connection is a slab insert,
//! closing one is a slab remove, and a connection's `mio::Token` is
//! just its slab key — no manual prev/next pointer surgery.

use mio::net::TcpStream;

/// One accepted client, growable receive/transmit buffers and all.
pub struct Connection {
    /// The underlying non-blocking stream.
    pub stream: TcpStream,
    /// Index into the daemon's rig table this connection's listener serves.
    pub rig_index: usize,
    /// Bytes read from the socket, not yet split into complete lines.
    rx: Vec<u8>,
    /// Bytes formatted by the dispatcher, not yet written to the socket.
    tx: Vec<u8>,
    /// How many bytes at the front of `tx` have already been written.
    tx_written: usize,
}

impl Connection {
    #[must_use]
    pub fn new(stream: TcpStream, rig_index: usize) -> Self {
        Self {
            stream,
            rig_index,
            rx: Vec::new(),
            tx: Vec::new(),
            tx_written: 0,
        }
    }

    /// Appends freshly read bytes to the receive buffer.
    pub fn push_read(&mut self, bytes: &[u8]) {
        self.rx.extend_from_slice(bytes);
    }

    /// Pulls at most one complete `\n`-terminated line out of the
    /// receive buffer, if one is present, leaving any remainder in
    /// place. Enforces the fairness invariant from the caller's side:
    /// the event loop calls this once per connection per iteration,
    /// never draining every pending line in one pass.
    pub fn take_line(&mut self) -> Option<Vec<u8>> {
        let newline_pos = self.rx.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.rx.drain(..=newline_pos).collect();
        line.pop(); // drop the '\n'
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }

    /// Queues bytes to be written out to the client.
    pub fn queue_write(&mut self, bytes: &[u8]) {
        if self.tx_written == self.tx.len() {
            self.tx.clear();
            self.tx_written = 0;
        }
        self.tx.extend_from_slice(bytes);
    }

    /// Whether this connection has unwritten output pending.
    #[must_use]
    pub fn has_pending_write(&self) -> bool {
        self.tx_written < self.tx.len()
    }

    /// Attempts to flush as much queued output as the socket will
    /// currently accept, via `std::io::Write`. Returns `Ok(())` on a
    /// partial or complete write, propagating the underlying error
    /// otherwise (the caller treats `WouldBlock` as "try again next
    /// readiness event").
    pub fn flush_writes(&mut self) -> std::io::Result<()> {
        use std::io::Write as _;
        while self.tx_written < self.tx.len() {
            match self.stream.write(&self.tx[self.tx_written..]) {
                Ok(0) => break,
                Ok(n) => self.tx_written += n,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_pair() -> (TcpStream, std::net::TcpStream) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let client = std::net::TcpStream::connect(addr).expect("connect");
        let (server, _) = listener.accept().expect("accept");
        server.set_nonblocking(true).expect("nonblocking");
        (TcpStream::from_std(server), client)
    }

    #[test]
    fn take_line_extracts_exactly_one_line_and_strips_crlf() {
        let (stream, _client) = loopback_pair();
        let mut conn = Connection::new(stream, 0);
        conn.push_read(b"f\r\nt\r\n");
        assert_eq!(conn.take_line(), Some(b"f".to_vec()));
        assert_eq!(conn.take_line(), Some(b"t".to_vec()));
        assert_eq!(conn.take_line(), None);
    }

    #[test]
    fn take_line_returns_none_without_a_terminator() {
        let (stream, _client) = loopback_pair();
        let mut conn = Connection::new(stream, 0);
        conn.push_read(b"f");
        assert_eq!(conn.take_line(), None);
    }

    #[test]
    fn queued_writes_flush_to_the_peer() {
        use std::io::Read as _;
        let (stream, mut client) = loopback_pair();
        let mut conn = Connection::new(stream, 0);
        conn.queue_write(b"RPRT 0\n");
        conn.flush_writes().expect("flush");
        let mut buf = [0u8; 16];
        let n = client.read(&mut buf).expect("read");
        assert_eq!(&buf[..n], b"RPRT 0\n");
        assert!(!conn.has_pending_write());
    }
}
