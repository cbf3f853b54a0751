//! Conversion of user-typed text into a value of the expected shape.
//!
//! The text is parsed as YAML (so JSON works too) and then converted by the
//! *target* shape, never by what the text looks like: `true` assigned to a
//! string field is the string `"true"`.

use serde_yaml::{Mapping, Number, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::Shape;

/// Boolean spellings accepted for boolean fields on top of `true`/`false`.
const YAML11_TRUE: &[&str] = &["y", "Y", "yes", "Yes", "YES", "on", "On", "ON"];
const YAML11_FALSE: &[&str] = &["n", "N", "no", "No", "NO", "off", "Off", "OFF"];

/// Parse `raw` and convert it to `shape`.
///
/// `at` is the dotted location used in error messages.
///
/// # Errors
///
/// - [`ConfigError::InvalidLiteral`] if the text is not valid YAML or a scalar
///   cannot be converted (e.g. `abc` for an integer).
/// - [`ConfigError::TypeMismatch`] if a mapping or sequence is given where a
///   scalar is expected, or vice versa.
/// - [`ConfigError::UnknownField`] if a mapping names a field the target
///   structure does not have.
pub fn coerce(raw: &str, shape: &Shape, at: &str) -> ConfigResult<Value> {
    let parsed: Value = serde_yaml::from_str(raw).map_err(|e| ConfigError::InvalidLiteral {
        value: raw.to_owned(),
        reason: e.to_string(),
    })?;

    // A bare scalar headed for a string keeps its exact spelling, so `1.10`
    // stays "1.10" instead of going through a float.
    if matches!(shape.required(), Shape::Text) && is_plain_scalar(&parsed) {
        return Ok(Value::String(raw.trim().to_owned()));
    }

    convert(parsed, shape, at)
}

fn is_plain_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_))
}

/// Convert an already-parsed YAML value to `shape`.
///
/// # Errors
///
/// Same as [`coerce`], minus YAML syntax errors.
pub fn convert(value: Value, shape: &Shape, at: &str) -> ConfigResult<Value> {
    if let Value::Tagged(tagged) = value {
        return Err(ConfigError::InvalidLiteral {
            value: tagged.tag.to_string(),
            reason: "YAML tags are not supported".to_owned(),
        });
    }

    match shape {
        Shape::Optional(inner) => match value {
            Value::Null => Ok(Value::Null),
            other => convert(other, inner, at),
        },
        Shape::Text => to_text(value, at),
        Shape::Bool => to_bool(value, at),
        Shape::Int { min, max } => to_int(value, *min, *max, at),
        Shape::Sequence(element) => to_sequence(value, element, at),
        Shape::Record(_) => to_record(value, shape, at),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn mismatch(value: &Value, shape: &Shape, at: &str) -> ConfigError {
    ConfigError::TypeMismatch {
        path: at.to_owned(),
        expected: shape.to_string(),
        found: kind(value).to_owned(),
    }
}

/// Render a scalar the way it would appear in the file.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => kind(other).to_owned(),
    }
}

fn invalid(value: &Value, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidLiteral {
        value: scalar_text(value),
        reason: reason.into(),
    }
}

fn to_text(value: Value, at: &str) -> ConfigResult<Value> {
    match value {
        Value::Sequence(_) | Value::Mapping(_) => Err(mismatch(&value, &Shape::Text, at)),
        scalar => Ok(Value::String(scalar_text(&scalar))),
    }
}

fn to_bool(value: Value, at: &str) -> ConfigResult<Value> {
    match value {
        Value::Bool(_) => Ok(value),
        Value::String(ref s) if YAML11_TRUE.contains(&s.as_str()) => Ok(Value::Bool(true)),
        Value::String(ref s) if YAML11_FALSE.contains(&s.as_str()) => Ok(Value::Bool(false)),
        Value::Sequence(_) | Value::Mapping(_) => Err(mismatch(&value, &Shape::Bool, at)),
        other => Err(invalid(&other, "expected a boolean")),
    }
}

fn to_int(value: Value, min: i64, max: i64, at: &str) -> ConfigResult<Value> {
    match value {
        Value::Number(ref n) if n.is_f64() => Err(invalid(&value, "expected an integer")),
        Value::Number(ref n) => match n.as_i64() {
            Some(i) if (min..=max).contains(&i) => Ok(Value::Number(Number::from(i))),
            _ => Err(invalid(
                &value,
                format!("integer out of range {min}..={max}"),
            )),
        },
        Value::Sequence(_) | Value::Mapping(_) => {
            Err(mismatch(&value, &Shape::Int { min, max }, at))
        },
        other => Err(invalid(&other, "expected an integer")),
    }
}

fn to_sequence(value: Value, element: &Shape, at: &str) -> ConfigResult<Value> {
    match value {
        Value::Null => Ok(Value::Sequence(Vec::new())),
        Value::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| convert(item, element, &format!("{at}[{i}]")))
            .collect::<ConfigResult<Vec<_>>>()
            .map(Value::Sequence),
        // A lone element stands for a one-element sequence.
        single => Ok(Value::Sequence(vec![convert(
            single,
            element,
            &format!("{at}[0]"),
        )?])),
    }
}

fn to_record(value: Value, shape: &Shape, at: &str) -> ConfigResult<Value> {
    let Shape::Record(fields) = shape else {
        return Err(mismatch(&value, shape, at));
    };
    let mut given = match value {
        Value::Mapping(map) => map,
        other => return Err(mismatch(&other, shape, at)),
    };

    for key in given.keys() {
        let known = key
            .as_str()
            .is_some_and(|name| fields.iter().any(|f| f.name == name));
        if !known {
            return Err(ConfigError::UnknownField {
                path: at.to_owned(),
                field: scalar_text(key),
            });
        }
    }

    // Rebuild in schema order; anything not given takes its zero value.
    let mut out = Mapping::new();
    for field in fields {
        let child_at = if at.is_empty() {
            field.name.to_owned()
        } else {
            format!("{at}.{}", field.name)
        };
        match given.remove(field.name) {
            Some(v) => {
                out.insert(
                    Value::String(field.name.to_owned()),
                    convert(v, &field.shape, &child_at)?,
                );
            },
            None if matches!(field.shape, Shape::Optional(_)) => {},
            None => {
                out.insert(Value::String(field.name.to_owned()), field.shape.zero());
            },
        }
    }
    Ok(Value::Mapping(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, Schema};
    use crate::types::{NamedAuthNSocketAddress, SocketAddress};

    fn port() -> Shape {
        u16::shape()
    }

    #[test]
    fn test_integer_from_text() {
        assert_eq!(coerce("9999", &port(), "p").unwrap(), Value::Number(9999.into()));
    }

    #[test]
    fn test_integer_rejects_words() {
        let err = coerce("abc", &port(), "p").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLiteral { ref value, .. } if value == "abc"));
    }

    #[test]
    fn test_integer_rejects_fractions_and_range() {
        assert!(matches!(
            coerce("1.5", &port(), "p"),
            Err(ConfigError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            coerce("70000", &port(), "p"),
            Err(ConfigError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            coerce("-1", &port(), "p"),
            Err(ConfigError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_text_keeps_spelling() {
        assert_eq!(
            coerce("true", &Shape::Text, "s").unwrap(),
            Value::String("true".to_owned())
        );
        assert_eq!(
            coerce("1.10", &Shape::Text, "s").unwrap(),
            Value::String("1.10".to_owned())
        );
        assert_eq!(
            coerce("'quoted value'", &Shape::Text, "s").unwrap(),
            Value::String("quoted value".to_owned())
        );
        assert_eq!(
            coerce("0.0.0.0", &Shape::Text, "s").unwrap(),
            Value::String("0.0.0.0".to_owned())
        );
    }

    #[test]
    fn test_text_rejects_collections() {
        assert!(matches!(
            coerce("[a, b]", &Shape::Text, "s"),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert!(matches!(
            coerce("{a: b}", &Shape::Text, "s"),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_bool_accepts_yaml11_spellings() {
        assert_eq!(coerce("true", &Shape::Bool, "b").unwrap(), Value::Bool(true));
        assert_eq!(coerce("yes", &Shape::Bool, "b").unwrap(), Value::Bool(true));
        assert_eq!(coerce("Off", &Shape::Bool, "b").unwrap(), Value::Bool(false));
        assert!(matches!(
            coerce("maybe", &Shape::Bool, "b"),
            Err(ConfigError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            coerce("1", &Shape::Bool, "b"),
            Err(ConfigError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_optional_null_clears() {
        let shape = Option::<i32>::shape();
        assert_eq!(coerce("null", &shape, "o").unwrap(), Value::Null);
        assert_eq!(coerce("~", &shape, "o").unwrap(), Value::Null);
        assert_eq!(coerce("3", &shape, "o").unwrap(), Value::Number(3.into()));
    }

    #[test]
    fn test_record_from_flow_mapping() {
        let value = coerce(
            "{address: 3.250.158.1, port: 9092}",
            &SocketAddress::shape(),
            "redpanda.rpc_server",
        )
        .unwrap();
        let addr: SocketAddress = serde_yaml::from_value(value).unwrap();
        assert_eq!(addr, SocketAddress::new("3.250.158.1", 9092));
    }

    #[test]
    fn test_record_from_json() {
        let value = coerce(
            r#"{"address": "10.0.0.1", "port": 9644, "name": "internal"}"#,
            &NamedAuthNSocketAddress::shape(),
            "a",
        )
        .unwrap();
        let addr: NamedAuthNSocketAddress = serde_yaml::from_value(value).unwrap();
        assert_eq!(addr.name, "internal");
        assert_eq!(addr.authentication_method, None);
    }

    #[test]
    fn test_record_missing_keys_are_zeroed() {
        let value = coerce("{port: 1}", &SocketAddress::shape(), "a").unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get("address"), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_record_unknown_key() {
        let err = coerce("{address: a, prot: 1}", &SocketAddress::shape(), "redpanda.rpc_server")
            .unwrap_err();
        match err {
            ConfigError::UnknownField { path, field } => {
                assert_eq!(path, "redpanda.rpc_server");
                assert_eq!(field, "prot");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_record_nested_error_location() {
        let shape = Shape::record([Field::of::<SocketAddress>("host")]);
        let err = coerce("{host: {address: a, port: [1]}}", &shape, "seed").unwrap_err();
        assert!(
            matches!(err, ConfigError::TypeMismatch { ref path, .. } if path == "seed.host.port"),
            "{err:?}"
        );
    }

    #[test]
    fn test_record_rejects_scalar() {
        assert!(matches!(
            coerce("9092", &SocketAddress::shape(), "a"),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_sequence_items_coerced() {
        let shape = Vec::<SocketAddress>::shape();
        let value = coerce("[{address: a, port: 1}, {address: b, port: 2}]", &shape, "s").unwrap();
        let addrs: Vec<SocketAddress> = serde_yaml::from_value(value).unwrap();
        assert_eq!(
            addrs,
            vec![SocketAddress::new("a", 1), SocketAddress::new("b", 2)]
        );
    }

    #[test]
    fn test_sequence_from_single_element() {
        let shape = Vec::<SocketAddress>::shape();
        let single = coerce("{address: a, port: 1}", &shape, "s").unwrap();
        let wrapped = coerce("[{address: a, port: 1}]", &shape, "s").unwrap();
        assert_eq!(single, wrapped);
    }

    #[test]
    fn test_sequence_of_text_stringifies_items() {
        let value = coerce("[--overprovisioned, 1, true]", &Vec::<String>::shape(), "s").unwrap();
        let flags: Vec<String> = serde_yaml::from_value(value).unwrap();
        assert_eq!(flags, vec!["--overprovisioned", "1", "true"]);
    }

    #[test]
    fn test_sequence_item_error_location() {
        let err = coerce("[1, x]", &Vec::<u16>::shape(), "ports").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLiteral { ref value, .. } if value == "x"));
    }

    #[test]
    fn test_unparseable_text() {
        assert!(matches!(
            coerce("{address: [", &SocketAddress::shape(), "a"),
            Err(ConfigError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_tags_rejected() {
        assert!(matches!(
            coerce("!custom 5", &port(), "p"),
            Err(ConfigError::InvalidLiteral { .. })
        ));
    }
}
