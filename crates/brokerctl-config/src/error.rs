use std::io;
use thiserror::Error;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The path expression could not be parsed.
    #[error("invalid path '{path}': {reason}")]
    MalformedPath {
        /// The path as typed by the user.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A path segment or mapping key names a field the schema does not have.
    #[error("unknown field '{field}' in '{path}'")]
    UnknownField {
        /// Dotted location of the parent that was searched.
        path: String,
        /// The field name that was not found.
        field: String,
    },

    /// An index addressed past the end of a sequence.
    #[error("index {index} out of range for '{path}' (length {len}); only {len} may be used to append")]
    IndexOutOfRange {
        /// Dotted location of the sequence.
        path: String,
        /// Requested index.
        index: usize,
        /// Current sequence length.
        len: usize,
    },

    /// The value's shape does not fit the type expected at the location.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Dotted location of the mismatch.
        path: String,
        /// Description of the expected type.
        expected: String,
        /// Description of what was supplied.
        found: String,
    },

    /// The raw value could not be parsed or converted to the expected scalar.
    #[error("invalid value '{value}': {reason}")]
    InvalidLiteral {
        /// The offending text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An address, host, or port could not be parsed.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress {
        /// The address as supplied.
        address: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No private IPv4 address was found on any local interface.
    #[error("unable to find a private IPv4 address for the current node")]
    NoPrivateAddress,

    /// More than one private IPv4 address was found.
    #[error("multiple private IPv4 addresses found ({}), please select one with --self", candidates.join(", "))]
    AmbiguousAddress {
        /// All candidate addresses.
        candidates: Vec<String>,
    },

    /// Enumerating local network interfaces failed.
    #[error("unable to list network interfaces: {source}")]
    InterfaceError {
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Failed to read the configuration file.
    #[error("failed to read config file at {path}: {source}")]
    LoadError {
        /// Path of the file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse config file at {path}: {source}")]
    ParseError {
        /// Path of the file that failed to parse.
        path: String,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Failed to write the configuration file.
    #[error("failed to write config file at {path}: {source}")]
    WriteError {
        /// Destination path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The document could not be converted to or from its YAML tree.
    #[error("failed to serialize config: {source}")]
    SerializeError {
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
