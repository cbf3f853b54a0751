//! Parsing of `--ips` seed specifications.

use std::net::{IpAddr, Ipv6Addr};

use crate::error::{ConfigError, ConfigResult};
use crate::types::{SeedServer, SocketAddress};

/// Longest accepted DNS name.
const MAX_HOSTNAME_LEN: usize = 253;
/// Longest accepted DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Parse every seed in order.
///
/// # Errors
///
/// Returns the first [`ConfigError::InvalidAddress`] encountered.
pub fn parse_seeds<S: AsRef<str>>(specs: &[S], default_port: u16) -> ConfigResult<Vec<SeedServer>> {
    specs
        .iter()
        .map(|spec| parse_seed(spec.as_ref(), default_port))
        .collect()
}

/// Parse `[scheme://]host[:port]` into a seed server.
///
/// The scheme is discarded. IPv6 literals may be bracketed to carry a port
/// (`[fd00::1]:33145`); a bare IPv6 literal takes `default_port`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidAddress`] if the host is neither an IP
/// literal nor a valid DNS name, or the port is not a valid TCP port.
pub fn parse_seed(spec: &str, default_port: u16) -> ConfigResult<SeedServer> {
    let invalid = |reason: &str| ConfigError::InvalidAddress {
        address: spec.to_owned(),
        reason: reason.to_owned(),
    };

    let trimmed = spec.trim();
    let hostport = match trimmed.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() => rest,
        Some(_) => return Err(invalid("empty scheme")),
        None => trimmed,
    };
    if hostport.is_empty() {
        return Err(invalid("missing host"));
    }
    if hostport.contains('/') {
        return Err(invalid("unexpected path after host"));
    }

    let (host, port) = split_host_port(hostport).ok_or_else(|| invalid("malformed host:port"))?;
    if host.parse::<IpAddr>().is_err() && !is_hostname(host) {
        return Err(invalid("host is neither an IP address nor a valid hostname"));
    }
    let port = match port {
        Some(text) => text
            .parse::<u16>()
            .map_err(|_| invalid("port must be an integer in 0..=65535"))?,
        None => default_port,
    };

    Ok(SeedServer {
        host: SocketAddress::new(host, port),
    })
}

/// Split off an optional port, stripping brackets from IPv6 hosts.
fn split_host_port(hostport: &str) -> Option<(&str, Option<&str>)> {
    if let Some(inner) = hostport.strip_prefix('[') {
        let (host, rest) = inner.split_once(']')?;
        host.parse::<Ipv6Addr>().ok()?;
        return match rest {
            "" => Some((host, None)),
            _ => Some((host, Some(rest.strip_prefix(':')?))),
        };
    }

    match hostport.matches(':').count() {
        0 => Some((hostport, None)),
        1 => hostport
            .split_once(':')
            .map(|(host, port)| (host, Some(port))),
        // More than one colon only makes sense as a bare IPv6 literal.
        _ => hostport
            .parse::<Ipv6Addr>()
            .ok()
            .map(|_| (hostport, None)),
    }
}

fn is_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    !host.is_empty()
        && host.len() <= MAX_HOSTNAME_LEN
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= MAX_LABEL_LEN
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        })
}
