//! Logging setup shared by the brokerctl binaries.
//!
//! # Example
//!
//! ```rust,no_run
//! use brokerctl_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), brokerctl_telemetry::TelemetryError> {
//! let config = LogConfig::new("warn")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("brokerctl_config=debug");
//!
//! setup_logging(&config)?;
//! tracing::debug!("editing redpanda.yaml");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, setup_logging};
