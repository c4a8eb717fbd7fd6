//! JSON path expressions.
//!
//! The syntax follows the dotted style used by response assertions:
//!
//! - `MRData.CircuitTable` walks object fields; a leading `$.` is optional.
//! - `Circuits[0]` indexes into an array.
//! - `Circuits.circuitId` reads `circuitId` from *every* element of the
//!   `Circuits` array and yields them as an array, in order.
//! - `Circuits[*]` explicitly projects over all elements.
//! - An index after a projection selects from the projected values, so
//!   `Circuits.circuitId[0]` is the first circuit id.

use std::fmt;

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
    Wildcard,
}

/// A parsed JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    segments: Vec<Segment>,
}

/// Intermediate selection: one value, or a projection over many.
enum Selection {
    One(Value),
    Many(Vec<Value>),
}

impl JsonPath {
    /// Parses a path expression.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidJsonPath`] for an empty expression,
    /// empty field names, unclosed brackets or non-numeric indices. A `$`
    /// root marker must stand alone or be followed by `.`.
    pub fn parse(path: &str) -> DomainResult<Self> {
        let raw = path.trim();

        let invalid = |reason: &str| DomainError::InvalidJsonPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("empty path"));
        }

        let body = match raw.strip_prefix('$') {
            None => raw,
            Some("") => "",
            Some(rest) => match rest.strip_prefix('.') {
                Some("") => return Err(invalid("trailing '.'")),
                Some(fields) => fields,
                None => return Err(invalid("expected '.' after '$'")),
            },
        };

        let mut segments = Vec::new();
        let mut chars = body.chars().peekable();
        let mut field = String::new();
        // True right after `]`, where a `.` or `[` must follow.
        let mut after_bracket = false;

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if field.is_empty() && !after_bracket {
                        return Err(invalid("empty field name"));
                    }
                    if !field.is_empty() {
                        segments.push(Segment::Field(std::mem::take(&mut field)));
                    }
                    after_bracket = false;
                    if chars.peek().is_none() {
                        return Err(invalid("trailing '.'"));
                    }
                }
                '[' => {
                    if !field.is_empty() {
                        segments.push(Segment::Field(std::mem::take(&mut field)));
                    }
                    let mut index = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == ']' {
                            closed = true;
                            break;
                        }
                        index.push(inner);
                    }
                    if !closed {
                        return Err(invalid("unclosed '['"));
                    }
                    let index = index.trim();
                    if index == "*" {
                        segments.push(Segment::Wildcard);
                    } else {
                        let position = index
                            .parse::<usize>()
                            .map_err(|_| invalid(&format!("invalid array index '{index}'")))?;
                        segments.push(Segment::Index(position));
                    }
                    after_bracket = true;
                }
                _ if after_bracket => return Err(invalid("expected '.' or '[' after ']'")),
                _ => field.push(ch),
            }
        }

        if !field.is_empty() {
            segments.push(Segment::Field(field));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// A path reading a single top-level field.
    #[must_use]
    pub fn field(name: &str) -> Self {
        Self {
            raw: name.to_string(),
            segments: vec![Segment::Field(name.to_string())],
        }
    }

    /// Selects from `root`.
    ///
    /// Returns `None` if any step finds nothing. A projection yields a
    /// `Value::Array` holding the selected values in document order.
    #[must_use]
    pub fn select(&self, root: &Value) -> Option<Value> {
        let mut selection = Selection::One(root.clone());

        for segment in &self.segments {
            selection = match (segment, selection) {
                (Segment::Field(name), Selection::One(Value::Array(items))) => {
                    Selection::Many(project(&items, name))
                }
                (Segment::Field(name), Selection::One(value)) => {
                    Selection::One(value.get(name)?.clone())
                }
                (Segment::Field(name), Selection::Many(items)) => {
                    Selection::Many(project(&items, name))
                }
                (Segment::Index(index), Selection::One(value)) => {
                    Selection::One(value.as_array()?.get(*index)?.clone())
                }
                (Segment::Index(index), Selection::Many(mut items)) => {
                    if *index >= items.len() {
                        return None;
                    }
                    Selection::One(items.swap_remove(*index))
                }
                (Segment::Wildcard, Selection::One(Value::Array(items))) => Selection::Many(items),
                (Segment::Wildcard, Selection::One(Value::Object(map))) => {
                    Selection::Many(map.into_iter().map(|(_, v)| v).collect())
                }
                (Segment::Wildcard, Selection::One(_)) => return None,
                (Segment::Wildcard, many @ Selection::Many(_)) => many,
            };
        }

        Some(match selection {
            Selection::One(value) => value,
            Selection::Many(items) => Value::Array(items),
        })
    }
}

/// Reads `name` from each element, flattening nested arrays.
fn project(items: &[Value], name: &str) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) => out.extend(project(inner, name)),
            other => {
                if let Some(value) = other.get(name) {
                    out.push(value.clone());
                }
            }
        }
    }
    out
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn circuits() -> Value {
        json!({
            "MRData": {
                "CircuitTable": {
                    "season": "2017",
                    "Circuits": [
                        {"circuitId": "albert_park", "Location": {"country": "Australia"}},
                        {"circuitId": "bahrain", "Location": {"country": "Bahrain"}},
                        {"circuitId": "catalunya", "Location": {"country": "Spain"}}
                    ]
                }
            }
        })
    }

    fn select(path: &str) -> Option<Value> {
        JsonPath::parse(path).unwrap().select(&circuits())
    }

    #[test]
    fn test_dotted_traversal() {
        assert_eq!(select("MRData.CircuitTable.season"), Some(json!("2017")));
        assert_eq!(select("$.MRData.CircuitTable.season"), Some(json!("2017")));
    }

    #[test]
    fn test_array_index() {
        assert_eq!(
            select("MRData.CircuitTable.Circuits[1].circuitId"),
            Some(json!("bahrain"))
        );
    }

    #[test]
    fn test_projection_over_array() {
        assert_eq!(
            select("MRData.CircuitTable.Circuits.circuitId"),
            Some(json!(["albert_park", "bahrain", "catalunya"]))
        );
    }

    #[test]
    fn test_index_after_projection() {
        assert_eq!(
            select("MRData.CircuitTable.Circuits.circuitId[0]"),
            Some(json!("albert_park"))
        );
        assert_eq!(
            select("MRData.CircuitTable.Circuits.Location[0].country"),
            Some(json!("Australia"))
        );
    }

    #[test]
    fn test_explicit_wildcard() {
        assert_eq!(
            select("MRData.CircuitTable.Circuits[*].Location.country"),
            Some(json!(["Australia", "Bahrain", "Spain"]))
        );
    }

    #[test]
    fn test_missing_field_is_none() {
        assert_eq!(select("MRData.RaceTable"), None);
        assert_eq!(select("MRData.CircuitTable.Circuits[9]"), None);
        assert_eq!(select("MRData.CircuitTable.Circuits.circuitId[9]"), None);
    }

    #[test]
    fn test_projection_skips_elements_without_field() {
        let doc = json!({"items": [{"id": 1}, {"name": "x"}, {"id": 3}]});
        let path = JsonPath::parse("items.id").unwrap();
        assert_eq!(path.select(&doc), Some(json!([1, 3])));
    }

    #[test]
    fn test_root_path() {
        let doc = json!({"md5": "abc"});
        assert_eq!(JsonPath::parse("$").unwrap().select(&doc), Some(doc.clone()));
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(matches!(
            JsonPath::parse(""),
            Err(DomainError::InvalidJsonPath { .. })
        ));
        assert!(JsonPath::parse("   ").is_err());
    }

    #[test]
    fn test_root_marker_must_be_followed_by_separator() {
        let err = JsonPath::parse("$x.y").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid JSON path '$x.y': expected '.' after '$'"
        );
        assert!(JsonPath::parse("$[0]").is_err());
        assert!(JsonPath::parse("$.").is_err());
    }

    #[test]
    fn test_display_is_expression_as_written() {
        let path = JsonPath::parse(" $.MRData.CircuitTable ").unwrap();
        assert_eq!(path.to_string(), "$.MRData.CircuitTable");
    }

    #[test]
    fn test_invalid_paths() {
        assert!(JsonPath::parse("a..b").is_err());
        assert!(JsonPath::parse("a[0").is_err());
        assert!(JsonPath::parse("a[x]").is_err());
        assert!(JsonPath::parse("a.").is_err());
        assert!(JsonPath::parse("a[0]b").is_err());
    }
}
