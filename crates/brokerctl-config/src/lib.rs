#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![warn(unreachable_pub)]
//! Editing and bootstrapping of the broker configuration file `redpanda.yaml`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use brokerctl_config::{BootstrapDefaults, BootstrapFlags, SystemInterfaces, bootstrap, loader};
//!
//! let path = loader::locate(None, Path::new("."));
//! let mut doc = loader::load(&path)?;
//!
//! // Any field can be reached by path; the value is converted to its type.
//! doc.set("redpanda.kafka_api[0].port", "19092")?;
//!
//! // Point the listeners at this node and join three seeds.
//! let flags = BootstrapFlags {
//!     seeds: vec!["node1".into(), "node2".into(), "node3".into()],
//!     ..Default::default()
//! };
//! bootstrap(&mut doc, &flags, &BootstrapDefaults::default(), &SystemInterfaces)?;
//!
//! loader::write(&path, &doc)?;
//! # Ok::<(), brokerctl_config::ConfigError>(())
//! ```
//!
//! # Design
//!
//! The document is a set of serde structs. Path edits go through a YAML tree
//! of the document, steered by the explicit [`Shape`] each type reports via
//! [`Schema`], and the typed document is rebuilt from the edited tree.
//! Keys that the structs do not model are carried along untouched.

/// Cluster bootstrap of seeds, node ID, and listen addresses.
pub mod bootstrap;
/// Path parsing, value conversion, and `set`/`get` on the document.
pub mod edit;
/// Configuration error types.
pub mod error;
/// Configuration file discovery, loading, and atomic writes.
pub mod loader;
/// Field schema used to steer path edits.
pub mod schema;
/// Configuration struct definitions.
pub mod types;

// Re-export primary types at the crate root.
pub use bootstrap::{
    BootstrapDefaults, BootstrapFlags, InterfaceSource, SystemInterfaces, bootstrap,
};
pub use edit::{Path, PathSegment};
pub use error::{ConfigError, ConfigResult};
pub use schema::{Field, Schema, Shape};
pub use types::*;
