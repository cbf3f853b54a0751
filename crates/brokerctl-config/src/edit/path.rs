use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

/// Indices at or above this value are rejected outright.
pub const MAX_INDEX: usize = 1000;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named member of a structure.
    Field(String),
    /// A position in a sequence.
    Index(usize),
}

/// A parsed location such as `redpanda.kafka_api[1].port`.
///
/// Always starts with a [`PathSegment::Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Parse a dotted path with optional `[n]` index qualifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedPath`] for empty input, empty segments,
    /// unbalanced brackets, or indices that are not small non-negative
    /// integers.
    pub fn parse(path: &str) -> ConfigResult<Self> {
        let malformed = |reason: String| ConfigError::MalformedPath {
            path: path.to_owned(),
            reason,
        };

        if path.is_empty() {
            return Err(malformed("path must not be empty".to_owned()));
        }

        let mut segments = Vec::new();
        for part in path.split('.') {
            if part.is_empty() {
                return Err(malformed("empty field name".to_owned()));
            }

            let (name, mut rest) = match part.find('[') {
                Some(open) => part.split_at(open),
                None => (part, ""),
            };
            if name.is_empty() {
                return Err(malformed(format!(
                    "index in '{part}' has no preceding field"
                )));
            }
            if name.contains(']') {
                return Err(malformed(format!("unbalanced brackets in '{part}'")));
            }
            segments.push(PathSegment::Field(name.to_owned()));

            while let Some(after_open) = rest.strip_prefix('[') {
                let Some((digits, after_close)) = after_open.split_once(']') else {
                    return Err(malformed(format!("missing closing ']' in '{part}'")));
                };
                segments.push(PathSegment::Index(parse_index(digits).map_err(malformed)?));
                rest = after_close;
            }
            if !rest.is_empty() {
                return Err(malformed(format!(
                    "unexpected '{rest}' after index in '{part}'"
                )));
            }
        }

        Ok(Self { segments })
    }

    /// The parsed segments, in order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

fn parse_index(digits: &str) -> Result<usize, String> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("index '{digits}' is not a non-negative integer"));
    }
    match digits.parse::<usize>() {
        Ok(index) if index < MAX_INDEX => Ok(index),
        _ => Err(format!("index {digits} is too large")),
    }
}

impl FromStr for Path {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> PathSegment {
        PathSegment::Field(name.to_owned())
    }

    fn reason(path: &str) -> String {
        match Path::parse(path) {
            Err(ConfigError::MalformedPath { reason, .. }) => reason,
            other => panic!("expected MalformedPath for {path:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_dotted() {
        let path = Path::parse("redpanda.rpc_server.port").unwrap();
        assert_eq!(
            path.segments(),
            &[field("redpanda"), field("rpc_server"), field("port")]
        );
    }

    #[test]
    fn test_parse_indexed() {
        let path: Path = "redpanda.advertised_kafka_api[1].address".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                field("redpanda"),
                field("advertised_kafka_api"),
                PathSegment::Index(1),
                field("address"),
            ]
        );
    }

    #[test]
    fn test_parse_nested_indices() {
        let path = Path::parse("matrix[0][12]").unwrap();
        assert_eq!(
            path.segments(),
            &[
                field("matrix"),
                PathSegment::Index(0),
                PathSegment::Index(12)
            ]
        );
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["rpk.tune_cpu", "redpanda.kafka_api[0].port", "a[1][2].b"] {
            assert_eq!(Path::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert!(reason("").contains("empty"));
        assert!(reason("redpanda..port").contains("empty field"));
        assert!(reason(".redpanda").contains("empty field"));
        assert!(reason("redpanda.").contains("empty field"));
    }

    #[test]
    fn test_rejects_bad_indices() {
        assert!(reason("kafka_api[x]").contains("not a non-negative integer"));
        assert!(reason("kafka_api[-1]").contains("not a non-negative integer"));
        assert!(reason("kafka_api[]").contains("not a non-negative integer"));
        assert!(reason("kafka_api[1000]").contains("too large"));
        assert!(Path::parse("kafka_api[999]").is_ok());
    }

    #[test]
    fn test_rejects_unbalanced_brackets() {
        assert!(reason("kafka_api[1").contains("missing closing"));
        assert!(reason("kafka_api]1").contains("unbalanced"));
        assert!(reason("kafka_api[1]x").contains("unexpected"));
    }

    #[test]
    fn test_rejects_index_without_field() {
        assert!(reason("[0]").contains("no preceding field"));
        assert!(reason("redpanda.[0]").contains("no preceding field"));
    }
}
