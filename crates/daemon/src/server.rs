//! The event loop: a single-process event loop that serves the rigctl
//! command language over TCP for all configured rigs.
//!
//! `Server` owns every piece of long-lived state in one value: the
//! `mio::Poll` handle, the rig table, and two `slab::Slab` arenas for
//! listeners and connections — arena-indexed in place of an intrusive
//! linked list. Nothing here spawns a thread; a rig
//! that answers slowly only ever blocks the clients waiting on that
//! one rig, since [`rig_kenwood::Rig`]'s methods are synchronous calls
//! made directly from this loop.

use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mio::{Events, Interest, Poll, Token};
use slab::Slab;

use crate::connection::Connection;
use crate::dispatch::dispatch_line;
use crate::listener::Listener;
use crate::registry::RigEntry;

/// Connection tokens are offset past every plausible listener slab key
/// so a bare `Token` value tells `run_once` which slab to look in
/// without a separate tag byte.
const CONN_TOKEN_OFFSET: usize = 1 << 24;

/// How long a single `poll` call blocks with nothing happening, so the
/// loop notices a shutdown request promptly without busy-spinning.
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

pub struct Server {
    poll: Poll,
    events: Events,
    rigs: Vec<RigEntry>,
    listeners: Slab<Listener>,
    connections: Slab<Connection>,
}

impl Server {
    /// # Errors
    ///
    /// Propagates failure to create the underlying `mio::Poll`.
    pub fn new(rigs: Vec<RigEntry>) -> std::io::Result<Self> {
        Ok(Self {
            poll: Poll::new()?,
            events: Events::with_capacity(1024),
            rigs,
            listeners: Slab::new(),
            connections: Slab::new(),
        })
    }

    /// Registers a freshly bound listener with the poll instance.
    ///
    /// # Errors
    ///
    /// Propagates registration failure.
    pub fn add_listener(&mut self, mut listener: Listener) -> std::io::Result<()> {
        let key = self.listeners.vacant_key();
        self.poll
            .registry()
            .register(&mut listener.socket, Token(key), Interest::READABLE)?;
        self.listeners.insert(listener);
        Ok(())
    }

    /// Runs until `shutdown` is set, polling with a bounded timeout so
    /// the flag is checked regularly even with no network activity.
    ///
    /// # Errors
    ///
    /// Propagates a hard failure from the underlying poll call.
    pub fn run(&mut self, shutdown: &AtomicBool) -> std::io::Result<()> {
        while !shutdown.load(Ordering::Relaxed) {
            self.run_once(POLL_TIMEOUT)?;
        }
        Ok(())
    }

    /// Runs a single poll-and-dispatch iteration; exposed separately so
    /// tests can drive the loop deterministically.
    ///
    /// # Errors
    ///
    /// Propagates a hard failure from the underlying poll call.
    pub fn run_once(&mut self, timeout: Duration) -> std::io::Result<()> {
        match self.poll.poll(&mut self.events, Some(timeout)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => return Ok(()),
            Err(e) => return Err(e),
        }

        let events: Vec<(Token, bool, bool)> = self
            .events
            .iter()
            .map(|e| (e.token(), e.is_readable(), e.is_writable()))
            .collect();

        for (token, readable, writable) in events {
            if token.0 < CONN_TOKEN_OFFSET {
                self.accept_ready(token.0);
            } else {
                let key = token.0 - CONN_TOKEN_OFFSET;
                if readable {
                    self.handle_readable(key);
                }
                if writable {
                    self.handle_writable(key);
                }
            }
        }
        Ok(())
    }

    fn accept_ready(&mut self, listener_key: usize) {
        let rig_index = match self.listeners.get(listener_key) {
            Some(l) => l.rig_index,
            None => return,
        };
        loop {
            let accepted = self
                .listeners
                .get_mut(listener_key)
                .map(|l| l.socket.accept());
            let Some(accepted) = accepted else { break };
            match accepted {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "accepted connection");
                    let mut conn = Connection::new(stream, rig_index);
                    let key = self.connections.vacant_key();
                    let token = Token(key + CONN_TOKEN_OFFSET);
                    if let Err(err) = self.poll.registry().register(
                        conn_stream_mut(&mut conn),
                        token,
                        Interest::READABLE,
                    ) {
                        tracing::warn!(%err, "failed to register connection");
                        continue;
                    }
                    self.connections.insert(conn);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(err) => {
                    tracing::warn!(%err, "accept failed");
                    break;
                }
            }
        }
    }

    fn handle_readable(&mut self, key: usize) {
        let Some(conn) = self.connections.get_mut(key) else { return };
        let mut buf = [0u8; 4096];
        loop {
            match std::io::Read::read(&mut conn.stream, &mut buf) {
                Ok(0) => {
                    self.close_connection(key);
                    return;
                }
                Ok(n) => conn.push_read(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(_) => {
                    self.close_connection(key);
                    return;
                }
            }
        }

        // Fairness invariant: dispatch at most one line per connection
        // per iteration, even if several arrived back to back.
        let Some(conn) = self.connections.get_mut(key) else { return };
        if let Some(line) = conn.take_line() {
            let rig_index = conn.rig_index;
            let reply = self
                .rigs
                .get(rig_index)
                .map(|entry| dispatch_line(&line, &entry.rig))
                .unwrap_or_else(|| b"RPRT -1\n".to_vec());
            if let Some(conn) = self.connections.get_mut(key) {
                conn.queue_write(&reply);
                self.flush_and_reregister(key);
            }
        }
    }

    fn handle_writable(&mut self, key: usize) {
        self.flush_and_reregister(key);
    }

    fn flush_and_reregister(&mut self, key: usize) {
        let Some(conn) = self.connections.get_mut(key) else { return };
        if conn.flush_writes().is_err() {
            self.close_connection(key);
            return;
        }
        let pending = conn.has_pending_write();
        if let Some(conn) = self.connections.get_mut(key) {
            let interest = if pending {
                Interest::READABLE | Interest::WRITABLE
            } else {
                Interest::READABLE
            };
            let token = Token(key + CONN_TOKEN_OFFSET);
            let _ = self
                .poll
                .registry()
                .reregister(conn_stream_mut(conn), token, interest);
        }
    }

    fn close_connection(&mut self, key: usize) {
        if let Some(mut conn) = self.connections.try_remove(key) {
            let _ = self.poll.registry().deregister(conn_stream_mut(&mut conn));
        }
    }
}

fn conn_stream_mut(conn: &mut Connection) -> &mut mio::net::TcpStream {
    &mut conn.stream
}
