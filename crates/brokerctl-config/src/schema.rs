//! Explicit field schema for the configuration document.
//!
//! The path editor never inspects Rust types at runtime. Instead every type in
//! [`crate::types`] describes itself as a [`Shape`], and the editor walks the
//! shape tree alongside the YAML tree. The shapes here must list the same
//! fields, under the same names, as the serde representation of the types.

use std::fmt;

use serde_yaml::{Mapping, Value};

use crate::types::{
    NamedAuthNSocketAddress, NamedSocketAddress, Pandaproxy, RedpandaNodeConfig, RedpandaYaml,
    RpkAdminApi, RpkKafkaApi, RpkNodeConfig, Sasl, SchemaRegistry, SeedServer, ServerTls,
    SocketAddress, Tls,
};

/// Static type expected at a location in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A boolean.
    Bool,
    /// An integer within an inclusive range.
    Int {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// A string.
    Text,
    /// A value that may be absent (`null`).
    Optional(Box<Shape>),
    /// An ordered list of elements of one shape.
    Sequence(Box<Shape>),
    /// A structure with named fields.
    Record(Vec<Field>),
}

/// One named member of a [`Shape::Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key used in the YAML file.
    pub name: &'static str,
    /// Shape of the value stored under `name`.
    pub shape: Shape,
}

impl Field {
    /// A field whose shape is given explicitly.
    #[must_use]
    pub fn new(name: &'static str, shape: Shape) -> Self {
        Self { name, shape }
    }

    /// A field whose shape is taken from a type implementing [`Schema`].
    #[must_use]
    pub fn of<T: Schema>(name: &'static str) -> Self {
        Self::new(name, T::shape())
    }
}

impl Shape {
    /// Build a record shape from its fields.
    #[must_use]
    pub fn record(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::Record(fields.into_iter().collect())
    }

    /// Look up a member of a record shape.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        match self {
            Self::Record(fields) => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// Strip any number of [`Shape::Optional`] wrappers.
    #[must_use]
    pub fn required(&self) -> &Shape {
        let mut shape = self;
        while let Self::Optional(inner) = shape {
            shape = &**inner;
        }
        shape
    }

    /// The zero value of this shape as a YAML tree.
    ///
    /// Records expand to a mapping holding the zero value of every required
    /// field; optional fields are left out.
    #[must_use]
    pub fn zero(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int { .. } => Value::Number(0.into()),
            Self::Text => Value::String(String::new()),
            Self::Optional(_) => Value::Null,
            Self::Sequence(_) => Value::Sequence(Vec::new()),
            Self::Record(fields) => {
                let mut map = Mapping::new();
                for field in fields {
                    if !matches!(field.shape, Self::Optional(_)) {
                        map.insert(Value::String(field.name.to_owned()), field.shape.zero());
                    }
                }
                Value::Mapping(map)
            },
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "boolean"),
            Self::Int { min, max } => write!(f, "integer in {min}..={max}"),
            Self::Text => write!(f, "string"),
            Self::Optional(inner) => write!(f, "optional {inner}"),
            Self::Sequence(inner) => write!(f, "sequence of {inner}"),
            Self::Record(_) => write!(f, "structure"),
        }
    }
}

/// Types that can describe their YAML shape.
pub trait Schema {
    /// The shape of this type.
    fn shape() -> Shape;
}

impl Schema for bool {
    fn shape() -> Shape {
        Shape::Bool
    }
}

impl Schema for String {
    fn shape() -> Shape {
        Shape::Text
    }
}

impl Schema for u16 {
    fn shape() -> Shape {
        Shape::Int {
            min: 0,
            max: i64::from(u16::MAX),
        }
    }
}

impl Schema for i32 {
    fn shape() -> Shape {
        Shape::Int {
            min: i64::from(i32::MIN),
            max: i64::from(i32::MAX),
        }
    }
}

impl<T: Schema> Schema for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }
}

impl<T: Schema> Schema for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }
}

// ---------------------------------------------------------------------------
// Document types
// ---------------------------------------------------------------------------

impl Schema for RedpandaYaml {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<String>("node_uuid"),
            Field::of::<String>("organization"),
            Field::of::<String>("license_key"),
            Field::of::<String>("cluster_id"),
            Field::of::<RedpandaNodeConfig>("redpanda"),
            Field::of::<RpkNodeConfig>("rpk"),
            Field::of::<Option<Pandaproxy>>("pandaproxy"),
            Field::of::<Option<SchemaRegistry>>("schema_registry"),
        ])
    }
}

impl Schema for RedpandaNodeConfig {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<String>("data_directory"),
            Field::of::<Option<i32>>("node_id"),
            Field::of::<String>("rack"),
            Field::of::<Option<bool>>("empty_seed_starts_cluster"),
            Field::of::<Vec<SeedServer>>("seed_servers"),
            Field::of::<SocketAddress>("rpc_server"),
            Field::of::<Vec<ServerTls>>("rpc_server_tls"),
            Field::of::<Option<SocketAddress>>("advertised_rpc_api"),
            Field::of::<Vec<NamedAuthNSocketAddress>>("kafka_api"),
            Field::of::<Vec<ServerTls>>("kafka_api_tls"),
            Field::of::<Vec<NamedSocketAddress>>("advertised_kafka_api"),
            Field::of::<Vec<NamedSocketAddress>>("admin"),
            Field::of::<Vec<ServerTls>>("admin_api_tls"),
            Field::of::<String>("cloud_storage_cache_directory"),
            Field::of::<bool>("developer_mode"),
            Field::of::<Option<bool>>("aggregate_metrics"),
            Field::of::<Option<bool>>("disable_public_metrics"),
        ])
    }
}

impl Schema for SeedServer {
    fn shape() -> Shape {
        Shape::record([Field::of::<SocketAddress>("host")])
    }
}

impl Schema for SocketAddress {
    fn shape() -> Shape {
        Shape::record([Field::of::<String>("address"), Field::of::<u16>("port")])
    }
}

impl Schema for NamedSocketAddress {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<String>("address"),
            Field::of::<u16>("port"),
            Field::of::<String>("name"),
        ])
    }
}

impl Schema for NamedAuthNSocketAddress {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<String>("address"),
            Field::of::<u16>("port"),
            Field::of::<String>("name"),
            Field::of::<Option<String>>("authentication_method"),
        ])
    }
}

impl Schema for ServerTls {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<String>("name"),
            Field::of::<String>("key_file"),
            Field::of::<String>("cert_file"),
            Field::of::<String>("truststore_file"),
            Field::of::<bool>("enabled"),
            Field::of::<bool>("require_client_auth"),
        ])
    }
}

impl Schema for RpkNodeConfig {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<RpkKafkaApi>("kafka_api"),
            Field::of::<RpkAdminApi>("admin_api"),
            Field::of::<Vec<String>>("additional_start_flags"),
            Field::of::<bool>("enable_memory_locking"),
            Field::of::<bool>("overprovisioned"),
            Field::of::<Option<i32>>("smp"),
            Field::of::<bool>("tune_network"),
            Field::of::<bool>("tune_disk_scheduler"),
            Field::of::<bool>("tune_disk_nomerges"),
            Field::of::<bool>("tune_disk_write_cache"),
            Field::of::<bool>("tune_disk_irq"),
            Field::of::<bool>("tune_fstrim"),
            Field::of::<bool>("tune_cpu"),
            Field::of::<bool>("tune_aio_events"),
            Field::of::<bool>("tune_clocksource"),
            Field::of::<bool>("tune_swappiness"),
            Field::of::<bool>("tune_transparent_hugepages"),
            Field::of::<bool>("tune_coredump"),
            Field::of::<String>("coredump_dir"),
            Field::of::<bool>("tune_ballast_file"),
            Field::of::<String>("ballast_file_path"),
            Field::of::<String>("ballast_file_size"),
            Field::of::<String>("well_known_io"),
        ])
    }
}

impl Schema for RpkKafkaApi {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<Vec<String>>("brokers"),
            Field::of::<Option<Tls>>("tls"),
            Field::of::<Option<Sasl>>("sasl"),
        ])
    }
}

impl Schema for RpkAdminApi {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<Vec<String>>("addresses"),
            Field::of::<Option<Tls>>("tls"),
        ])
    }
}

impl Schema for Tls {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<String>("key_file"),
            Field::of::<String>("cert_file"),
            Field::of::<String>("truststore_file"),
        ])
    }
}

impl Schema for Sasl {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<String>("user"),
            Field::of::<String>("password"),
            Field::of::<String>("type"),
        ])
    }
}

impl Schema for Pandaproxy {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<Vec<NamedAuthNSocketAddress>>("pandaproxy_api"),
            Field::of::<Vec<ServerTls>>("pandaproxy_api_tls"),
            Field::of::<Vec<NamedSocketAddress>>("advertised_pandaproxy_api"),
        ])
    }
}

impl Schema for SchemaRegistry {
    fn shape() -> Shape {
        Shape::record([
            Field::of::<Vec<NamedAuthNSocketAddress>>("schema_registry_api"),
            Field::of::<Vec<ServerTls>>("schema_registry_api_tls"),
            Field::of::<Option<i32>>("schema_registry_replication_factor"),
        ])
    }
}
