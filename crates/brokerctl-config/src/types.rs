//! Typed representation of `redpanda.yaml`.
//!
//! Every struct derives [`Default`] as its *zero value* (empty strings, zero
//! ports, empty lists). The zero value is what the path editor creates when a
//! location does not exist yet; the development defaults written on first use
//! live in [`RedpandaYaml::dev_default`].
//!
//! Keys this crate does not model are kept in the flattened `other` map of the
//! enclosing struct, so rewriting a file never drops them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Address every listener binds to until it is told otherwise.
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";
/// Default Kafka API port.
pub const DEFAULT_KAFKA_PORT: u16 = 9092;
/// Default Admin API port.
pub const DEFAULT_ADMIN_PORT: u16 = 9644;
/// Default inter-node RPC port, also used for seed servers without a port.
pub const DEFAULT_RPC_PORT: u16 = 33145;
/// Default HTTP proxy port.
pub const DEFAULT_PROXY_PORT: u16 = 8082;
/// Default schema registry port.
pub const DEFAULT_SCHEMA_REGISTRY_PORT: u16 = 8081;

/// Default data directory for development configurations.
pub const DEFAULT_DATA_DIRECTORY: &str = "/var/lib/redpanda/data";
/// Default coredump directory for development configurations.
pub const DEFAULT_COREDUMP_DIRECTORY: &str = "/var/lib/redpanda/coredump";

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

// ---------------------------------------------------------------------------
// Top-level document
// ---------------------------------------------------------------------------

/// Root of the broker configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedpandaYaml {
    /// Node UUID assigned by the broker on first start.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub node_uuid: String,
    /// Organization name used for telemetry.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub organization: String,
    /// Enterprise license key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub license_key: String,
    /// Cluster identifier used for telemetry.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cluster_id: String,
    /// Broker node configuration.
    pub redpanda: RedpandaNodeConfig,
    /// Settings for the command-line tooling and tuners.
    pub rpk: RpkNodeConfig,
    /// HTTP proxy listeners.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pandaproxy: Option<Pandaproxy>,
    /// Schema registry listeners.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_registry: Option<SchemaRegistry>,
    /// Top-level keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

impl RedpandaYaml {
    /// The configuration written for a node that has no file yet.
    ///
    /// It carries exactly one Kafka API and one Admin API listener, both bound
    /// to [`DEFAULT_LISTEN_ADDRESS`].
    #[must_use]
    pub fn dev_default() -> Self {
        Self {
            redpanda: RedpandaNodeConfig {
                data_directory: DEFAULT_DATA_DIRECTORY.to_owned(),
                rpc_server: SocketAddress::new(DEFAULT_LISTEN_ADDRESS, DEFAULT_RPC_PORT),
                kafka_api: vec![NamedAuthNSocketAddress {
                    address: DEFAULT_LISTEN_ADDRESS.to_owned(),
                    port: DEFAULT_KAFKA_PORT,
                    ..Default::default()
                }],
                admin: vec![NamedSocketAddress {
                    address: DEFAULT_LISTEN_ADDRESS.to_owned(),
                    port: DEFAULT_ADMIN_PORT,
                    ..Default::default()
                }],
                developer_mode: true,
                ..Default::default()
            },
            rpk: RpkNodeConfig {
                coredump_dir: DEFAULT_COREDUMP_DIRECTORY.to_owned(),
                overprovisioned: true,
                ..Default::default()
            },
            pandaproxy: Some(Pandaproxy::default()),
            schema_registry: Some(SchemaRegistry::default()),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// RedpandaNodeConfig
// ---------------------------------------------------------------------------

/// The `redpanda` section: node identity, storage, and listeners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedpandaNodeConfig {
    /// Directory holding the log segments.
    pub data_directory: String,
    /// Explicit node ID. Assigned automatically by the cluster when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<i32>,
    /// Rack identifier for rack-aware replica placement.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rack: String,
    /// Whether a node with an empty seed list may form a new cluster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_seed_starts_cluster: Option<bool>,
    /// Peers contacted while joining or forming the cluster.
    pub seed_servers: Vec<SeedServer>,
    /// Internal RPC listener.
    pub rpc_server: SocketAddress,
    /// TLS settings for the RPC listener.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rpc_server_tls: Vec<ServerTls>,
    /// Address advertised to other nodes for RPC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertised_rpc_api: Option<SocketAddress>,
    /// Kafka API listeners.
    pub kafka_api: Vec<NamedAuthNSocketAddress>,
    /// TLS settings per Kafka API listener.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kafka_api_tls: Vec<ServerTls>,
    /// Addresses advertised to Kafka clients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advertised_kafka_api: Vec<NamedSocketAddress>,
    /// Admin API listeners.
    pub admin: Vec<NamedSocketAddress>,
    /// TLS settings per Admin API listener.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admin_api_tls: Vec<ServerTls>,
    /// Local cache directory for tiered storage.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cloud_storage_cache_directory: String,
    /// Relaxes production checks for single-machine development.
    pub developer_mode: bool,
    /// Aggregate metrics labels to reduce cardinality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_metrics: Option<bool>,
    /// Disable the public metrics endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_public_metrics: Option<bool>,
    /// Node properties this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// A seed peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedServer {
    /// Host and RPC port of the peer.
    pub host: SocketAddress,
}

/// A plain host/port pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketAddress {
    /// Host name or IP literal.
    pub address: String,
    /// TCP port.
    pub port: u16,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

impl SocketAddress {
    /// Build an address from a host and a port.
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            other: BTreeMap::new(),
        }
    }
}

/// A listener address with an optional name used to pair it with TLS settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedSocketAddress {
    /// Host name or IP literal.
    pub address: String,
    /// TCP port.
    pub port: u16,
    /// Listener name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

/// A Kafka listener, which may also pick an authentication method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedAuthNSocketAddress {
    /// Host name or IP literal.
    pub address: String,
    /// TCP port.
    pub port: u16,
    /// Listener name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Authentication method (`sasl`, `mtls_identity`, `none`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_method: Option<String>,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

/// TLS settings for one named listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerTls {
    /// Name of the listener these settings apply to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Private key file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key_file: String,
    /// Certificate file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cert_file: String,
    /// CA bundle used to verify clients.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub truststore_file: String,
    /// Whether TLS is enabled on the listener.
    #[serde(skip_serializing_if = "is_false")]
    pub enabled: bool,
    /// Whether clients must present a certificate.
    #[serde(skip_serializing_if = "is_false")]
    pub require_client_auth: bool,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

// ---------------------------------------------------------------------------
// RpkNodeConfig
// ---------------------------------------------------------------------------

/// The `rpk` section: tuner toggles and client connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RpkNodeConfig {
    /// Kafka client settings.
    #[serde(skip_serializing_if = "RpkKafkaApi::is_empty")]
    pub kafka_api: RpkKafkaApi,
    /// Admin client settings.
    #[serde(skip_serializing_if = "RpkAdminApi::is_empty")]
    pub admin_api: RpkAdminApi,
    /// Extra flags passed to the broker on start.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_start_flags: Vec<String>,
    /// Lock broker memory.
    #[serde(skip_serializing_if = "is_false")]
    pub enable_memory_locking: bool,
    /// Run without pinning threads, for shared machines.
    #[serde(skip_serializing_if = "is_false")]
    pub overprovisioned: bool,
    /// Number of cores to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smp: Option<i32>,
    /// Tune network queues and interrupts.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_network: bool,
    /// Set the disk I/O scheduler.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_disk_scheduler: bool,
    /// Disable disk request merging.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_disk_nomerges: bool,
    /// Use write-through caching on disks.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_disk_write_cache: bool,
    /// Distribute disk interrupts.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_disk_irq: bool,
    /// Schedule periodic fstrim.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_fstrim: bool,
    /// Set the CPU governor to performance.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_cpu: bool,
    /// Raise the async I/O event limit.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_aio_events: bool,
    /// Use the TSC clock source.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_clocksource: bool,
    /// Lower swappiness.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_swappiness: bool,
    /// Enable transparent huge pages.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_transparent_hugepages: bool,
    /// Write core dumps to `coredump_dir`.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_coredump: bool,
    /// Directory for core dumps.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub coredump_dir: String,
    /// Preallocate a ballast file.
    #[serde(skip_serializing_if = "is_false")]
    pub tune_ballast_file: bool,
    /// Ballast file location.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ballast_file_path: String,
    /// Ballast file size, e.g. `1GiB`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ballast_file_size: String,
    /// Cloud vendor, VM type, and storage type triple for I/O properties.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub well_known_io: String,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

/// Kafka client connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpkKafkaApi {
    /// Seed brokers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub brokers: Vec<String>,
    /// Client TLS material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<Tls>,
    /// SASL credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sasl: Option<Sasl>,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

impl RpkKafkaApi {
    fn is_empty(&self) -> bool {
        self.brokers.is_empty()
            && self.tls.is_none()
            && self.sasl.is_none()
            && self.other.is_empty()
    }
}

/// Admin client connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpkAdminApi {
    /// Admin API addresses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
    /// Client TLS material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<Tls>,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

impl RpkAdminApi {
    fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.tls.is_none() && self.other.is_empty()
    }
}

/// Client-side TLS files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tls {
    /// Private key file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key_file: String,
    /// Certificate file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cert_file: String,
    /// CA bundle.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub truststore_file: String,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

/// SASL credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sasl {
    /// User name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// Password. Written to the file, never to logs.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// SASL mechanism, e.g. `SCRAM-SHA-256`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub mechanism: String,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

impl std::fmt::Debug for Sasl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sasl")
            .field("user", &self.user)
            .field("has_password", &!self.password.is_empty())
            .field("mechanism", &self.mechanism)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// HTTP proxy and schema registry
// ---------------------------------------------------------------------------

/// The `pandaproxy` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pandaproxy {
    /// HTTP proxy listeners.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pandaproxy_api: Vec<NamedAuthNSocketAddress>,
    /// TLS settings per proxy listener.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pandaproxy_api_tls: Vec<ServerTls>,
    /// Addresses advertised to proxy clients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advertised_pandaproxy_api: Vec<NamedSocketAddress>,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

/// The `schema_registry` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaRegistry {
    /// Schema registry listeners.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schema_registry_api: Vec<NamedAuthNSocketAddress>,
    /// TLS settings per schema registry listener.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schema_registry_api_tls: Vec<ServerTls>,
    /// Replication factor of the internal schemas topic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_registry_replication_factor: Option<i32>,
    /// Keys this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_default_has_single_listeners() {
        let cfg = RedpandaYaml::dev_default();
        assert_eq!(cfg.redpanda.kafka_api.len(), 1);
        assert_eq!(cfg.redpanda.admin.len(), 1);
        assert_eq!(cfg.redpanda.rpc_server.address, DEFAULT_LISTEN_ADDRESS);
        assert_eq!(cfg.redpanda.rpc_server.port, DEFAULT_RPC_PORT);
        assert!(cfg.redpanda.seed_servers.is_empty());
    }

    #[test]
    fn test_dev_default_yaml_layout() {
        let yaml = serde_yaml::to_string(&RedpandaYaml::dev_default()).unwrap();
        assert!(yaml.contains("seed_servers: []"));
        assert!(yaml.contains("pandaproxy: {}"));
        assert!(yaml.contains("schema_registry: {}"));
        assert!(yaml.contains("overprovisioned: true"));
        assert!(!yaml.contains("node_id"));
        assert!(!yaml.contains("tune_cpu"));
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let yaml = r"
redpanda:
  data_directory: /data
  auto_create_topics_enabled: true
  seed_servers: []
pandaproxy_client:
  brokers:
    - address: 127.0.0.1
      port: 9092
";
        let cfg: RedpandaYaml = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.redpanda.other.contains_key("auto_create_topics_enabled"));
        assert!(cfg.other.contains_key("pandaproxy_client"));

        let written = serde_yaml::to_string(&cfg).unwrap();
        let reread: RedpandaYaml = serde_yaml::from_str(&written).unwrap();
        assert_eq!(cfg, reread);
    }

    #[test]
    fn test_sasl_debug_redacts_password() {
        let sasl = Sasl {
            user: "admin".to_owned(),
            password: "hunter2".to_owned(),
            mechanism: "SCRAM-SHA-256".to_owned(),
            ..Default::default()
        };
        let debug_str = format!("{sasl:?}");
        assert!(!debug_str.contains("hunter2"));
        assert!(debug_str.contains("has_password: true"));
    }

    #[test]
    fn test_sasl_mechanism_serialized_as_type() {
        let sasl = Sasl {
            mechanism: "SCRAM-SHA-512".to_owned(),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&sasl).unwrap();
        assert_eq!(yaml.trim(), "type: SCRAM-SHA-512");
    }
}
