//! Picking the address this node listens on.

use std::io;
use std::net::IpAddr;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Source of the IP addresses assigned to local network interfaces.
pub trait InterfaceSource {
    /// Every address currently assigned to an interface, in any order.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the interfaces cannot be listed.
    fn addresses(&self) -> io::Result<Vec<IpAddr>>;
}

/// Reads interface addresses from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

#[cfg(unix)]
impl InterfaceSource for SystemInterfaces {
    fn addresses(&self) -> io::Result<Vec<IpAddr>> {
        let interfaces = nix::ifaddrs::getifaddrs().map_err(io::Error::from)?;
        let mut addrs = Vec::new();
        for iface in interfaces {
            let Some(storage) = iface.address else {
                continue;
            };
            if let Some(v4) = storage.as_sockaddr_in() {
                addrs.push(IpAddr::V4(v4.ip()));
            } else if let Some(v6) = storage.as_sockaddr_in6() {
                addrs.push(IpAddr::V6(v6.ip()));
            }
        }
        debug!(count = addrs.len(), "listed interface addresses");
        Ok(addrs)
    }
}

#[cfg(not(unix))]
impl InterfaceSource for SystemInterfaces {
    fn addresses(&self) -> io::Result<Vec<IpAddr>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "listing interfaces is not supported on this platform",
        ))
    }
}

/// Resolve the address this node should listen on.
///
/// An explicit address must be an IP literal and is returned in canonical
/// form. Without one, the single private IPv4 address among the local
/// interfaces is used.
///
/// # Errors
///
/// - [`ConfigError::InvalidAddress`] if `explicit` is not an IP literal.
/// - [`ConfigError::InterfaceError`] if the interfaces cannot be listed.
/// - [`ConfigError::NoPrivateAddress`] if no private IPv4 address exists.
/// - [`ConfigError::AmbiguousAddress`] if several exist.
pub fn resolve_self_address<I>(explicit: Option<&str>, interfaces: &I) -> ConfigResult<IpAddr>
where
    I: InterfaceSource + ?Sized,
{
    if let Some(text) = explicit {
        let ip: IpAddr = text
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                address: text.to_owned(),
                reason: "not a valid IP address".to_owned(),
            })?;
        return Ok(ip.to_canonical());
    }

    let addrs = interfaces
        .addresses()
        .map_err(|source| ConfigError::InterfaceError { source })?;

    let mut private: Vec<IpAddr> = Vec::new();
    for addr in addrs.iter().map(IpAddr::to_canonical) {
        if matches!(addr, IpAddr::V4(v4) if v4.is_private()) && !private.contains(&addr) {
            private.push(addr);
        }
    }

    match private.as_slice() {
        [] => Err(ConfigError::NoPrivateAddress),
        [only] => Ok(*only),
        many => Err(ConfigError::AmbiguousAddress {
            candidates: many.iter().map(ToString::to_string).collect(),
        }),
    }
}
