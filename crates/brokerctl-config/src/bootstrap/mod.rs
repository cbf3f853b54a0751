//! Cluster bootstrap: seed servers, node ID, and listen addresses.
//!
//! Bootstrap only replaces listen addresses that still hold the development
//! default ([`DEFAULT_LISTEN_ADDRESS`]). Lists with more than one listener
//! are assumed to be deliberate and are left alone; empty lists get a single
//! listener on the resolved address.

mod address;
mod seeds;

pub use address::{InterfaceSource, SystemInterfaces, resolve_self_address};
pub use seeds::{parse_seed, parse_seeds};

use tracing::{debug, info};

use crate::error::ConfigResult;
use crate::types::{
    DEFAULT_ADMIN_PORT, DEFAULT_KAFKA_PORT, DEFAULT_LISTEN_ADDRESS, DEFAULT_RPC_PORT,
    NamedAuthNSocketAddress, NamedSocketAddress, RedpandaYaml,
};

/// User-supplied bootstrap options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapFlags {
    /// Address to listen on. Resolved from the local interfaces when unset.
    pub self_address: Option<String>,
    /// Seed servers as `[scheme://]host[:port]`.
    pub seeds: Vec<String>,
    /// Node ID to pin, if any.
    pub node_id: Option<i32>,
}

/// The defaults bootstrap compares against and fills in from.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapDefaults {
    /// Development defaults; must hold exactly one Kafka and one Admin listener.
    pub document: RedpandaYaml,
    /// Listen address that bootstrap is allowed to replace.
    pub listen_address: String,
    /// Port of a synthesized Kafka listener.
    pub kafka_port: u16,
    /// Port of a synthesized Admin listener.
    pub admin_port: u16,
    /// Port given to seeds that do not name one.
    pub rpc_port: u16,
}

impl Default for BootstrapDefaults {
    fn default() -> Self {
        Self {
            document: RedpandaYaml::dev_default(),
            listen_address: DEFAULT_LISTEN_ADDRESS.to_owned(),
            kafka_port: DEFAULT_KAFKA_PORT,
            admin_port: DEFAULT_ADMIN_PORT,
            rpc_port: DEFAULT_RPC_PORT,
        }
    }
}

/// Prepare `doc` for joining or forming a cluster.
///
/// Seeds and the self address are resolved before anything is changed, so on
/// error `doc` is untouched.
///
/// # Errors
///
/// - [`ConfigError::InvalidAddress`](crate::ConfigError::InvalidAddress) for a
///   bad seed or `--self` value.
/// - [`ConfigError::NoPrivateAddress`](crate::ConfigError::NoPrivateAddress),
///   [`ConfigError::AmbiguousAddress`](crate::ConfigError::AmbiguousAddress),
///   or [`ConfigError::InterfaceError`](crate::ConfigError::InterfaceError)
///   when the address has to be discovered and cannot be.
///
/// # Panics
///
/// Panics if `defaults.document` does not carry exactly one Kafka and one
/// Admin listener.
pub fn bootstrap<I>(
    doc: &mut RedpandaYaml,
    flags: &BootstrapFlags,
    defaults: &BootstrapDefaults,
    interfaces: &I,
) -> ConfigResult<()>
where
    I: InterfaceSource + ?Sized,
{
    let seeds = parse_seeds(&flags.seeds, defaults.rpc_port)?;
    let self_ip = resolve_self_address(flags.self_address.as_deref(), interfaces)?.to_string();
    info!(address = %self_ip, seeds = seeds.len(), "bootstrapping node");

    assert!(
        defaults.document.redpanda.kafka_api.len() == 1
            && defaults.document.redpanda.admin.len() == 1,
        "bootstrap defaults must have exactly one kafka and one admin listener"
    );

    let node = &mut doc.redpanda;

    if let Some(id) = flags.node_id {
        info!(node_id = id, "setting node id");
        node.node_id = Some(id);
    }

    if node.rpc_server.address == defaults.listen_address {
        debug!(address = %self_ip, "replacing default rpc_server address");
        node.rpc_server.address.clone_from(&self_ip);
    }

    match node.kafka_api.len() {
        0 => {
            debug!(address = %self_ip, "adding kafka_api listener");
            node.kafka_api = vec![NamedAuthNSocketAddress {
                address: self_ip.clone(),
                port: defaults.kafka_port,
                ..Default::default()
            }];
        },
        1 => {
            let first = &mut node.kafka_api[0].address;
            if *first == defaults.listen_address {
                debug!(address = %self_ip, "replacing default kafka_api address");
                first.clone_from(&self_ip);
            }
        },
        n => debug!(listeners = n, "keeping existing kafka_api listeners"),
    }

    match node.admin.len() {
        0 => {
            debug!(address = %self_ip, "adding admin listener");
            node.admin = vec![NamedSocketAddress {
                address: self_ip.clone(),
                port: defaults.admin_port,
                ..Default::default()
            }];
        },
        1 => {
            let first = &mut node.admin[0].address;
            if *first == defaults.listen_address {
                debug!(address = %self_ip, "replacing default admin address");
                first.clone_from(&self_ip);
            }
        },
        n => debug!(listeners = n, "keeping existing admin listeners"),
    }

    node.seed_servers = seeds;
    Ok(())
}
