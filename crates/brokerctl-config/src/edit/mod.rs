//! Path-based editing of a [`RedpandaYaml`] document.
//!
//! `set` walks a dotted path such as `redpanda.kafka_api[0].port` through a
//! scratch YAML tree of the document, guided by the [`Schema`] shapes, and
//! replaces the addressed location with the coerced value. The typed document
//! is only swapped for the edited one once the whole walk and the final
//! re-decode succeed.

mod coerce;
mod path;
mod walk;

pub use coerce::{coerce, convert};
pub use path::{MAX_INDEX, Path, PathSegment};

use serde_yaml::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::Schema;
use crate::types::RedpandaYaml;
use walk::Mode;

impl RedpandaYaml {
    /// Assign the text `value` to the location named by `key`.
    ///
    /// Missing structures on the way are created with their zero value, an
    /// index equal to the current length appends one element, and the final
    /// location is replaced wholesale. On error `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MalformedPath`] if `key` does not parse.
    /// - [`ConfigError::UnknownField`] if a path segment or a mapping key in
    ///   `value` names a field that does not exist.
    /// - [`ConfigError::IndexOutOfRange`] if an index is past the end.
    /// - [`ConfigError::TypeMismatch`] / [`ConfigError::InvalidLiteral`] if
    ///   `value` cannot be converted to the type at `key`.
    pub fn set(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let path = Path::parse(key)?;
        let shape = Self::shape();
        let mut tree = self.to_tree()?;

        let (slot, target, at) = walk::locate(&mut tree, &shape, &path, Mode::Extend)?;
        *slot = coerce(value, target, &at)?;
        debug!(path = %at, expected = %target, "value coerced");

        *self = serde_yaml::from_value(tree).map_err(|e| ConfigError::SerializeError { source: e })?;
        Ok(())
    }

    /// Read the value at `key` as a YAML tree.
    ///
    /// Locations that are absent from the document read as their zero value.
    ///
    /// # Errors
    ///
    /// Same path errors as [`RedpandaYaml::set`]; an index equal to the length
    /// is out of range here.
    pub fn get(&self, key: &str) -> ConfigResult<Value> {
        let path = Path::parse(key)?;
        let shape = Self::shape();
        let mut tree = self.to_tree()?;

        let (slot, _, _) = walk::locate(&mut tree, &shape, &path, Mode::Read)?;
        Ok(slot.clone())
    }

    fn to_tree(&self) -> ConfigResult<Value> {
        serde_yaml::to_value(self).map_err(|e| ConfigError::SerializeError { source: e })
    }
}
