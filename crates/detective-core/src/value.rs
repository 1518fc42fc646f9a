//! Property values and result records as they come back from the database.
//!
//! `PropertyValue` carries a total order so that whole result sets can be
//! sorted and compared independently of row and column order. Integers and
//! floats compare numerically, so `1` and `1.0` are the same value.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    fn rank(&self) -> u8 {
        match self {
            PropertyValue::Null => 0,
            PropertyValue::Bool(_) => 1,
            PropertyValue::Int(_) | PropertyValue::Float(_) => 2,
            PropertyValue::String(_) => 3,
            PropertyValue::List(_) => 4,
            PropertyValue::Map(_) => 5,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::Int(_) => "integer",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::List(_) => "list",
            PropertyValue::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, PropertyValue>> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use PropertyValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (List(a), List(b)) => a.cmp(b),
            (Map(a), Map(b)) => a.iter().cmp(b.iter()),
            _ if self.rank() == 2 && other.rank() == 2 => {
                let (a, b) = (self.as_f64().unwrap_or(0.0), other.as_f64().unwrap_or(0.0));
                a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PropertyValue {}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Float(x) => write!(f, "{x:?}"),
            PropertyValue::String(s) => write!(f, "{s}"),
            PropertyValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            PropertyValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Bool(b) => PropertyValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Int(i),
                None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => PropertyValue::String(s),
            serde_json::Value::Array(items) => {
                PropertyValue::List(items.into_iter().map(PropertyValue::from).collect())
            }
            serde_json::Value::Object(map) => PropertyValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, PropertyValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("missing column `{0}`")]
    MissingColumn(String),
    #[error("column `{column}` should be {expected}, got {found}")]
    UnexpectedType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// One result row: column name to value, in the column order the database returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(into = "BTreeMap<String, PropertyValue>")]
pub struct Record {
    columns: Vec<(String, PropertyValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        Self {
            columns: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builds a record from a JSON object; anything else yields an empty record.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => Self::from_pairs(map),
            _ => Self::default(),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<PropertyValue>) {
        self.columns.push((column.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &(String, PropertyValue)> {
        self.columns.iter()
    }

    pub fn get(&self, column: &str) -> Option<&PropertyValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn require(&self, column: &str) -> Result<&PropertyValue, RecordError> {
        self.get(column)
            .ok_or_else(|| RecordError::MissingColumn(column.to_string()))
    }

    pub fn require_str(&self, column: &str) -> Result<&str, RecordError> {
        let value = self.require(column)?;
        value.as_str().ok_or(RecordError::UnexpectedType {
            column: column.to_string(),
            expected: "string",
            found: value.type_name(),
        })
    }

    /// Key/value pairs sorted by key, the column-order-independent form of the row.
    pub fn normalized(&self) -> Vec<(String, PropertyValue)> {
        let mut pairs = self.columns.clone();
        pairs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        pairs
    }
}

impl From<Record> for BTreeMap<String, PropertyValue> {
    fn from(record: Record) -> Self {
        record.columns.into_iter().collect()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                PropertyValue::String(s) => write!(f, "{key}: {s:?}")?,
                other => write!(f, "{key}: {other}")?,
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_compare_across_representations() {
        assert_eq!(PropertyValue::Int(475500), PropertyValue::Float(475500.0));
        assert!(PropertyValue::Int(2) < PropertyValue::Float(2.5));
        assert!(PropertyValue::Float(6.0) > PropertyValue::Int(5));
    }

    #[test]
    fn test_values_of_different_kinds_order_by_kind() {
        let mut values = vec![
            PropertyValue::from("b"),
            PropertyValue::Int(3),
            PropertyValue::Null,
            PropertyValue::Bool(true),
            PropertyValue::from("a"),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                PropertyValue::Null,
                PropertyValue::Bool(true),
                PropertyValue::Int(3),
                PropertyValue::from("a"),
                PropertyValue::from("b"),
            ]
        );
    }

    #[test]
    fn test_json_conversion() {
        let value = PropertyValue::from(json!({"amount": 1500, "height": 6.1, "tags": ["x", null]}));
        let map = value.as_map().expect("map");
        assert_eq!(map["amount"], PropertyValue::Int(1500));
        assert_eq!(map["height"], PropertyValue::Float(6.1));
        assert_eq!(
            map["tags"],
            PropertyValue::List(vec![PropertyValue::from("x"), PropertyValue::Null])
        );
    }

    #[test]
    fn test_record_normalized_sorts_by_key() {
        let record = Record::from_pairs([("b", PropertyValue::Int(2)), ("a", PropertyValue::Int(1))]);
        let normalized = record.normalized();
        assert_eq!(normalized[0].0, "a");
        assert_eq!(normalized[1].0, "b");
        // Original column order is preserved for display.
        assert_eq!(record.columns().next().map(|(k, _)| k.as_str()), Some("b"));
    }

    #[test]
    fn test_require_str_reports_type() {
        let record = Record::from_json(json!({"id": 7}));
        assert_eq!(
            record.require_str("id"),
            Err(RecordError::UnexpectedType {
                column: "id".into(),
                expected: "string",
                found: "integer",
            })
        );
        assert_eq!(
            record.require("labels"),
            Err(RecordError::MissingColumn("labels".into()))
        );
    }

    #[test]
    fn test_display() {
        let record = Record::from_pairs([("suspect", "Alice")]);
        assert_eq!(record.to_string(), "{suspect: \"Alice\"}");
        assert_eq!(PropertyValue::Float(6.0).to_string(), "6.0");
        assert_eq!(
            PropertyValue::List(vec![PropertyValue::Int(1), PropertyValue::from("x")]).to_string(),
            "[1, x]"
        );
    }
}
