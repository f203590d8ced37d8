//! # Overview
//!
//! The TCP control front end: a single-process, single-threaded event
//! loop that serves the rigctl command language over TCP for every
//! configured rig ([`server`]), the rig bring-up/teardown bookkeeping
//! that turns a configuration file into live [`rig_kenwood::Rig`]
//! handles ([`registry`]), listener bring-up ([`listener`]), per-client
//! buffering ([`connection`]), and the command dispatcher itself
//! ([`dispatch`]).
//!
//! # Design
//!
//! One `Server` value owns every piece of long-lived state — the
//! `mio::Poll` handle, the rig table, and `slab::Slab` arenas for
//! listeners and connections — and nothing here ever blocks outside
//! the poll call itself. A slow rig only ever stalls the clients
//! waiting on that one rig.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod connection;
pub mod dispatch;
pub mod error;
pub mod listener;
pub mod names;
pub mod registry;
pub mod server;

#[cfg(test)]
mod test_support;

pub use error::DaemonError;
pub use registry::{bring_up_all, RigEntry};
pub use server::Server;

/// Brings up every configured rig, binds a listener per resolved
/// address family for each, and builds the `Server` ready to `run`.
///
/// This is the one call a binary entrypoint needs; everything else in
/// this crate is exposed for testing and for callers that want finer
/// control over bring-up (binding a subset of rigs, for instance).
///
/// # Errors
///
/// Returns [`DaemonError::NoActiveRigs`] if every rig section failed to
/// initialize, or propagates a listener bind / poll-creation failure.
pub fn build_server(
    cfg: &mut dyn rig_config::ConfigSource,
    sections: &[String],
) -> Result<Server, DaemonError> {
    let entries = registry::bring_up_all(cfg, sections)?;

    let mut bound = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let address = cfg.get_string(&entry.section, "rigctld_address", "127.0.0.1");
        let port = cfg.get_int(&entry.section, "rigctld_port", 4532);
        let port = u16::try_from(port).unwrap_or(4532);
        match listener::bind_rigctld_listeners(&entry.section, &address, port, index) {
            Ok(mut listeners) => bound.append(&mut listeners),
            Err(err) => tracing::warn!(section = %entry.section, %err, "no rigctld listener bound for rig"),
        }
    }
    if bound.is_empty() {
        return Err(DaemonError::NoActiveRigs);
    }

    let mut server = Server::new(entries)?;
    for listener in bound {
        server.add_listener(listener)?;
    }
    Ok(server)
}
