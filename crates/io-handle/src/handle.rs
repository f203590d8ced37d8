use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use rig_transport::Transport;

use crate::response::IoResponse;

/// Receives every response the reader could not hand to a synchronous
/// waiter: unsolicited rig notifications, and anything a waiter rejected
/// because its prefix did not match.
pub trait AsyncSink: Send + Sync {
    /// Delivers one response observed outside a synchronous wait.
    fn deliver(&self, response: IoResponse);
}

/// Reads one framed [`IoResponse`] from the transport, or `None` on EOF,
/// timeout, or a framing error.
///
/// Runs exclusively on the reader thread; it owns the read half of the
/// transport for the lifetime of the handle.
pub trait Framer: Send {
    /// Blocks until one frame is available or the link signals EOF.
    fn next_response(&mut self, transport: &mut dyn Transport) -> Option<IoResponse>;
}

/// The explicit rendezvous state replacing a two-semaphore handoff.
///
/// `Idle -> WaiterArmed -> MessageDelivered -> Acked -> Idle`. The reader
/// publishes into `MessageDelivered` and blocks until the waiter
/// transitions to `Acked`; the waiter never touches the slot before it is
/// delivered and never leaves it unconsumed.
enum HandoffState {
    Idle,
    WaiterArmed,
    MessageDelivered(Option<IoResponse>),
    Acked,
}

struct Shared {
    state: Mutex<HandoffState>,
    cvar: Condvar,
    /// Serializes waiters; held for the whole duration of `get_response`
    /// so at most one synchronous wait is ever in flight.
    sync_lock: Mutex<()>,
    terminate: Mutex<bool>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns a transport endpoint and the background reader thread that
/// demultiplexes it into synchronous replies and asynchronous
/// notifications.
///
/// The reader thread owns one cloned half of the transport for reads; this
/// handle keeps the other half for writes issued from the caller's
/// thread — the link is logically half-duplex, but both halves share the
/// same underlying serial line, so a write never races a read.
pub struct IoHandle {
    shared: Arc<Shared>,
    writer: Mutex<Box<dyn Transport>>,
    reader: Option<JoinHandle<()>>,
    async_sink: Arc<dyn AsyncSink>,
}

impl IoHandle {
    /// Spawns the reader thread over `transport`, framing with `framer`
    /// and delivering anything not claimed by a waiter to `async_sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be duplicated for the
    /// reader thread's exclusive use.
    pub fn start(
        transport: Box<dyn Transport>,
        mut framer: Box<dyn Framer>,
        async_sink: Arc<dyn AsyncSink>,
    ) -> io::Result<Self> {
        let mut reader_half = transport.try_clone()?;
        let writer_half = transport;

        let shared = Arc::new(Shared {
            state: Mutex::new(HandoffState::Idle),
            cvar: Condvar::new(),
            sync_lock: Mutex::new(()),
            terminate: Mutex::new(false),
        });

        let reader_shared = Arc::clone(&shared);
        let reader_sink = Arc::clone(&async_sink);
        let reader = std::thread::spawn(move || {
            reader_loop(&reader_shared, reader_half.as_mut(), framer.as_mut(), &*reader_sink);
        });

        Ok(Self {
            shared,
            writer: Mutex::new(writer_half),
            reader: Some(reader),
            async_sink,
        })
    }

    /// Signals the reader to stop and joins it.
    ///
    /// The reader only notices termination between frames (or when it is
    /// parked waiting for a waiter to ack), so this may block briefly on
    /// the transport's own read timeout.
    pub fn end(mut self) {
        *lock(&self.shared.terminate) = true;
        self.shared.cvar.notify_all();
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }

    /// Waits for the next response whose bytes at `match_pos` begin with
    /// `match_bytes`. Anything else the reader produces in the meantime
    /// is handed to the async sink and the wait continues.
    ///
    /// Returns `None` on EOF/transport failure.
    #[must_use]
    pub fn get_response(&self, match_bytes: &[u8], match_pos: usize) -> Option<IoResponse> {
        let _serialize = lock(&self.shared.sync_lock);

        let mut state = lock(&self.shared.state);
        *state = HandoffState::WaiterArmed;
        self.shared.cvar.notify_all();

        loop {
            state = self
                .shared
                .cvar
                .wait_while(state, |s| !matches!(s, HandoffState::MessageDelivered(_)))
                .unwrap_or_else(PoisonError::into_inner);

            let response = match std::mem::replace(&mut *state, HandoffState::Idle) {
                HandoffState::MessageDelivered(r) => r,
                _ => unreachable!("condvar only wakes on MessageDelivered"),
            };

            match response {
                None => {
                    *state = HandoffState::Acked;
                    self.shared.cvar.notify_all();
                    return None;
                }
                Some(r) if r.matches_at(match_pos, match_bytes) => {
                    *state = HandoffState::Acked;
                    self.shared.cvar.notify_all();
                    return Some(r);
                }
                Some(r) => {
                    // Doesn't match: ack so the reader can proceed, then
                    // hand the rejected message to the async sink
                    // (outside the lock, since delivery may be slow),
                    // then wait for the reader to settle back to Idle
                    // before re-arming. Re-arming must not race the
                    // reader observing Acked: both transitions are
                    // separately notified and separately awaited so
                    // neither side can miss the other's state change.
                    *state = HandoffState::Acked;
                    self.shared.cvar.notify_all();
                    drop(state);
                    self.async_sink.deliver(r);

                    state = lock(&self.shared.state);
                    state = self
                        .shared
                        .cvar
                        .wait_while(state, |s| !matches!(s, HandoffState::Idle))
                        .unwrap_or_else(PoisonError::into_inner);
                    *state = HandoffState::WaiterArmed;
                    self.shared.cvar.notify_all();
                }
            }
        }
    }

    /// Writes `buf`, blocking up to `timeout` for the link to accept it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport write fails.
    pub fn write(&self, buf: &[u8], timeout: Duration) -> io::Result<usize> {
        lock(&self.writer).write(buf, timeout)
    }

    /// Blocks up to `timeout` for the link to become writable.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport poll fails.
    pub fn wait_write(&self, timeout: Duration) -> io::Result<bool> {
        lock(&self.writer).wait_write(timeout)
    }
}

fn reader_loop(
    shared: &Shared,
    transport: &mut dyn Transport,
    framer: &mut dyn Framer,
    async_sink: &dyn AsyncSink,
) {
    loop {
        if *lock(&shared.terminate) {
            return;
        }

        let use_sem = matches!(*lock(&shared.state), HandoffState::WaiterArmed);

        let response = framer.next_response(transport);

        if *lock(&shared.terminate) {
            return;
        }

        let mut state = lock(&shared.state);
        let waiter_now = matches!(*state, HandoffState::WaiterArmed);

        if waiter_now {
            if response.is_some() || use_sem {
                *state = HandoffState::MessageDelivered(response);
                shared.cvar.notify_all();
                state = shared
                    .cvar
                    .wait_while(state, |s| !matches!(s, HandoffState::Acked))
                    .unwrap_or_else(PoisonError::into_inner);
                *state = HandoffState::Idle;
                shared.cvar.notify_all();
            }
            // else: no message and no waiter was observed at the start of
            // this iteration — drop silently, leave the waiter armed for
            // the next iteration.
        } else {
            drop(state);
            if let Some(r) = response {
                async_sink.deliver(r);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

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

    /// Yields whatever has been pushed through `tx`, blocking until the
    /// next item arrives; a dropped sender makes every further call
    /// return `None` without blocking, simulating a dead link.
    struct ScriptedFramer {
        rx: mpsc::Receiver<Option<IoResponse>>,
    }

    impl Framer for ScriptedFramer {
        fn next_response(&mut self, _transport: &mut dyn Transport) -> Option<IoResponse> {
            self.rx.recv().unwrap_or(None)
        }
    }

    #[derive(Default, Clone)]
    struct RecordingSink {
        seen: Arc<Mutex<Vec<IoResponse>>>,
    }

    impl AsyncSink for RecordingSink {
        fn deliver(&self, response: IoResponse) {
            lock(&self.seen).push(response);
        }
    }

    fn start(
    ) -> (IoHandle, mpsc::Sender<Option<IoResponse>>, RecordingSink) {
        let (tx, rx) = mpsc::channel();
        let sink = RecordingSink::default();
        let handle = IoHandle::start(
            Box::new(NullTransport),
            Box::new(ScriptedFramer { rx }),
            Arc::new(sink.clone()),
        )
        .expect("null transport always clones");
        (handle, tx, sink)
    }

    #[test]
    fn waiter_receives_matching_response() {
        let (handle, tx, _sink) = start();
        let handle = Arc::new(handle);
        let waiter = {
            let handle = Arc::clone(&handle);
            std::thread::spawn(move || handle.get_response(b"IF", 0))
        };
        std::thread::sleep(Duration::from_millis(20));
        tx.send(Some(IoResponse::new(b"IF00014250000;".to_vec())))
            .unwrap();
        let resp = waiter.join().unwrap().expect("response");
        assert_eq!(resp.bytes(), b"IF00014250000;");
        drop(tx);
        Arc::into_inner(handle)
            .expect("sole owner after join")
            .end();
    }

    #[test]
    fn non_matching_responses_go_to_async_sink_and_wait_continues() {
        let (handle, tx, sink) = start();
        let handle = Arc::new(handle);
        let waiter = {
            let handle = Arc::clone(&handle);
            std::thread::spawn(move || handle.get_response(b"FA", 0))
        };
        // Give the waiter thread time to arm before anything is sent, so
        // both messages are observed with a waiter already pending.
        std::thread::sleep(Duration::from_millis(20));
        tx.send(Some(IoResponse::new(b"AI1;".to_vec()))).unwrap();
        tx.send(Some(IoResponse::new(b"FA00014250000;".to_vec())))
            .unwrap();
        let resp = waiter.join().unwrap().expect("response");
        assert_eq!(resp.bytes(), b"FA00014250000;");
        assert_eq!(lock(&sink.seen).len(), 1);
        assert_eq!(lock(&sink.seen)[0].bytes(), b"AI1;");
        drop(tx);
        Arc::into_inner(handle)
            .expect("sole owner after join")
            .end();
    }

    #[test]
    fn eof_surfaces_as_none() {
        let (handle, tx, _sink) = start();
        let handle = Arc::new(handle);
        let waiter = {
            let handle = Arc::clone(&handle);
            std::thread::spawn(move || handle.get_response(b"IF", 0))
        };
        std::thread::sleep(Duration::from_millis(20));
        tx.send(None).unwrap();
        assert!(waiter.join().unwrap().is_none());
        drop(tx);
        Arc::into_inner(handle)
            .expect("sole owner after join")
            .end();
    }

    #[test]
    fn unsolicited_message_without_a_waiter_goes_to_async_sink() {
        let (handle, tx, sink) = start();
        tx.send(Some(IoResponse::new(b"BN01;".to_vec()))).unwrap();
        // Give the reader a moment to drain the channel and deliver.
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(lock(&sink.seen).len(), 1);
        assert_eq!(lock(&sink.seen)[0].bytes(), b"BN01;");
        drop(tx);
        handle.end();
    }

    #[test]
    fn sequential_waiters_are_served_one_at_a_time() {
        let (handle, tx, _sink) = start();
        let handle = Arc::new(handle);

        let h1 = Arc::clone(&handle);
        let first = std::thread::spawn(move || h1.get_response(b"FA", 0));
        std::thread::sleep(Duration::from_millis(20));
        tx.send(Some(IoResponse::new(b"FA00014250000;".to_vec())))
            .unwrap();
        assert!(first.join().unwrap().is_some());

        let h2 = Arc::clone(&handle);
        let second = std::thread::spawn(move || h2.get_response(b"FB", 0));
        std::thread::sleep(Duration::from_millis(20));
        tx.send(Some(IoResponse::new(b"FB00014300000;".to_vec())))
            .unwrap();
        assert!(second.join().unwrap().is_some());

        drop(tx);
        Arc::into_inner(handle)
            .expect("sole owner after join")
            .end();
    }
}
