use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::path::{Path, PathSegment};
use crate::error::{ConfigError, ConfigResult};
use crate::schema::Shape;

/// Whether a walk may grow sequences by one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    /// `index == len` appends a zero-valued element.
    Extend,
    /// Every index must already exist.
    Read,
}

/// Walk `root` along `path`, creating missing containers with their zero
/// value, and return the addressed location with its shape and dotted name.
///
/// `root` is expected to be a scratch tree: a failed walk may have already
/// inserted zero values on the way.
pub(super) fn locate<'a, 's>(
    root: &'a mut Value,
    root_shape: &'s Shape,
    path: &Path,
    mode: Mode,
) -> ConfigResult<(&'a mut Value, &'s Shape, String)> {
    let mut cursor = root;
    let mut shape = root_shape;
    let mut at = String::new();

    for segment in path.segments() {
        // Step through optional wrappers, materializing absent values.
        while let Shape::Optional(inner) = shape {
            if cursor.is_null() {
                debug!(path = %at, "creating optional value");
                *cursor = inner.zero();
            }
            shape = &**inner;
        }

        match segment {
            PathSegment::Field(name) => {
                let Some(field) = shape.field(name) else {
                    return Err(ConfigError::UnknownField {
                        path: at,
                        field: name.clone(),
                    });
                };
                if !at.is_empty() {
                    at.push('.');
                }
                at.push_str(name);
                cursor = descend_field(cursor, name, &field.shape, shape, &at)?;
                shape = &field.shape;
            },
            PathSegment::Index(index) => {
                let Shape::Sequence(element) = shape else {
                    return Err(ConfigError::TypeMismatch {
                        path: at,
                        expected: "sequence".to_owned(),
                        found: shape.to_string(),
                    });
                };
                cursor = descend_index(cursor, *index, element, mode, &at)?;
                at.push_str(&format!("[{index}]"));
                shape = &**element;
            },
        }
    }

    Ok((cursor, shape, at))
}

fn descend_field<'a>(
    node: &'a mut Value,
    name: &str,
    field_shape: &Shape,
    parent_shape: &Shape,
    at: &str,
) -> ConfigResult<&'a mut Value> {
    if node.is_null() {
        *node = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(map) = node else {
        return Err(ConfigError::TypeMismatch {
            path: at.to_owned(),
            expected: parent_shape.to_string(),
            found: "scalar".to_owned(),
        });
    };
    Ok(map
        .entry(Value::String(name.to_owned()))
        .or_insert_with(|| field_shape.zero()))
}

fn descend_index<'a>(
    node: &'a mut Value,
    index: usize,
    element: &Shape,
    mode: Mode,
    at: &str,
) -> ConfigResult<&'a mut Value> {
    if node.is_null() {
        *node = Value::Sequence(Vec::new());
    }
    let Value::Sequence(items) = node else {
        return Err(ConfigError::TypeMismatch {
            path: at.to_owned(),
            expected: "sequence".to_owned(),
            found: "scalar".to_owned(),
        });
    };

    let len = items.len();
    if index == len && mode == Mode::Extend {
        debug!(path = %at, index, "appending element");
        items.push(element.zero());
    }
    items.get_mut(index).ok_or(ConfigError::IndexOutOfRange {
        path: at.to_owned(),
        index,
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::types::RedpandaYaml;

    fn tree() -> Value {
        serde_yaml::to_value(RedpandaYaml::dev_default()).unwrap()
    }

    #[test]
    fn test_locate_existing_scalar() {
        let mut root = tree();
        let shape = RedpandaYaml::shape();
        let path = Path::parse("redpanda.rpc_server.port").unwrap();
        let (value, found, at) = locate(&mut root, &shape, &path, Mode::Read).unwrap();
        assert_eq!(value.as_u64(), Some(33145));
        assert_eq!(found.to_string(), "integer in 0..=65535");
        assert_eq!(at, "redpanda.rpc_server.port");
    }

    #[test]
    fn test_locate_creates_missing_optional() {
        let mut root = tree();
        let shape = RedpandaYaml::shape();
        let path = Path::parse("redpanda.advertised_rpc_api.address").unwrap();
        let (value, _, _) = locate(&mut root, &shape, &path, Mode::Extend).unwrap();
        assert_eq!(value.as_str(), Some(""));
        assert!(root["redpanda"]["advertised_rpc_api"].is_mapping());
    }

    #[test]
    fn test_locate_read_does_not_append() {
        let mut root = tree();
        let shape = RedpandaYaml::shape();
        let path = Path::parse("redpanda.kafka_api[1]").unwrap();
        let err = locate(&mut root, &shape, &path, Mode::Read).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::IndexOutOfRange { index: 1, len: 1, .. }
        ));
    }

    #[test]
    fn test_locate_extend_appends_once() {
        let mut root = tree();
        let shape = RedpandaYaml::shape();
        let path = Path::parse("redpanda.kafka_api[1].port").unwrap();
        locate(&mut root, &shape, &path, Mode::Extend).unwrap();
        assert_eq!(root["redpanda"]["kafka_api"].as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_locate_index_past_end() {
        let mut root = tree();
        let shape = RedpandaYaml::shape();
        let path = Path::parse("redpanda.kafka_api[2]").unwrap();
        let err = locate(&mut root, &shape, &path, Mode::Extend).unwrap_err();
        match err {
            ConfigError::IndexOutOfRange { path, index, len } => {
                assert_eq!(path, "redpanda.kafka_api");
                assert_eq!(index, 2);
                assert_eq!(len, 1);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_locate_unknown_field() {
        let mut root = tree();
        let shape = RedpandaYaml::shape();
        let path = Path::parse("redpanda.kafka_apis").unwrap();
        let err = locate(&mut root, &shape, &path, Mode::Extend).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownField { ref path, ref field } if path == "redpanda" && field == "kafka_apis"
        ));
    }

    #[test]
    fn test_locate_field_below_scalar() {
        let mut root = tree();
        let shape = RedpandaYaml::shape();
        let path = Path::parse("redpanda.data_directory.path").unwrap();
        assert!(matches!(
            locate(&mut root, &shape, &path, Mode::Extend),
            Err(ConfigError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_locate_index_on_structure() {
        let mut root = tree();
        let shape = RedpandaYaml::shape();
        let path = Path::parse("redpanda.rpc_server[0]").unwrap();
        assert!(matches!(
            locate(&mut root, &shape, &path, Mode::Extend),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }
}
