use std::net::{Ipv4Addr, TcpListener};

use crate::error::{Error, Result};

/// Whether a listener can be bound on `port` on all interfaces. The listener
/// is dropped straight away.
pub fn is_port_free(port: u16) -> bool {
    TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).is_ok()
}

/// [`Error::PortTaken`] if something already holds `port`.
pub fn ensure_port_free(port: u16) -> Result<()> {
    if is_port_free(port) {
        Ok(())
    } else {
        Err(Error::PortTaken { port })
    }
}
