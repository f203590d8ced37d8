//! Binding rigctld listeners.
//!
//! Each rig section names one `rigctld_address`/`rigctld_port` pair;
//! that name can resolve to more than one address family (an IPv4 and
//! an IPv6 record for the same host). This module binds one listener
//! per resolved family and drops the rig entirely if none bound —
//! there is no point serving a rig nobody can reach.

use std::net::TcpListener as StdTcpListener;

use dns_lookup::lookup_host;
use mio::net::TcpListener as MioTcpListener;
use socket2::{Domain, Socket, Type};

use crate::error::DaemonError;

/// A bound, non-blocking TCP listener for one rig, tagged with the
/// index of that rig in the daemon's rig table.
pub struct Listener {
    /// The underlying mio listener, ready to register with a [`mio::Poll`].
    pub socket: MioTcpListener,
    /// Index into the daemon's rig table this listener serves.
    pub rig_index: usize,
}

fn bind_one(addr: std::net::SocketAddr) -> std::io::Result<StdTcpListener> {
    let domain = if addr.is_ipv6() { Domain::IPV6 } else { Domain::IPV4 };
    let socket = Socket::new(domain, Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;
    let std_listener: StdTcpListener = socket.into();
    std_listener.set_nonblocking(true)?;
    Ok(std_listener)
}

/// Resolves `address`/`port` and binds one listener per resolved family,
/// tagging each with `rig_index`.
///
/// # Errors
///
/// Returns [`DaemonError::NoListenerBound`] if the name resolved to
/// nothing, or every resolved address failed to bind.
pub fn bind_rigctld_listeners(
    section: &str,
    address: &str,
    port: u16,
    rig_index: usize,
) -> Result<Vec<Listener>, DaemonError> {
    let ips = lookup_host(address).map_err(|_| DaemonError::NoListenerBound {
        section: section.to_string(),
    })?;

    let mut listeners = Vec::new();
    for ip in ips {
        let addr = std::net::SocketAddr::new(ip, port);
        match bind_one(addr) {
            Ok(std_listener) => {
                let socket = MioTcpListener::from_std(std_listener);
                listeners.push(Listener { socket, rig_index });
            }
            Err(err) => {
                tracing::warn!(%section, %addr, %err, "failed to bind rigctld listener");
            }
        }
    }

    if listeners.is_empty() {
        return Err(DaemonError::NoListenerBound {
            section: section.to_string(),
        });
    }
    Ok(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_a_loopback_listener_and_reports_its_rig_index() {
        let listeners = bind_rigctld_listeners("rig1", "127.0.0.1", 0, 3).expect("loopback always binds");
        assert!(!listeners.is_empty());
        assert!(listeners.iter().all(|l| l.rig_index == 3));
    }

    #[test]
    fn unresolvable_host_yields_no_listener_bound() {
        let err = bind_rigctld_listeners("rig1", "this-host-does-not-resolve.invalid", 4532, 0)
            .expect_err("bogus hostname must not resolve");
        assert!(matches!(err, DaemonError::NoListenerBound { .. }));
    }
}
