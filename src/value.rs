use std::{cmp::Ordering, collections::BTreeMap};

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::{Deserialize, Serialize};

/// A runtime value produced by field resolution and expression evaluation.
///
/// Mirrors the shapes frontmatter can hold, plus a first-class date for the
/// reserved `file.ctime` / `file.mtime` fields.
///
/// # Examples
///
/// ```
/// use dataview_lang::Value;
///
/// assert!(Value::from("active").is_truthy());
/// assert!(!Value::Integer(0).is_truthy());
/// assert!(Value::Integer(1).loose_eq(&Value::Float(1.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Timestamp, always UTC
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    /// Ordered so that every iteration and rendering is deterministic
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Null, false, zero, and empty text/collections are false; everything else is true.
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null => false,
            Boolean(b) => *b,
            Integer(n) => *n != 0,
            Float(n) => *n != 0.0,
            String(s) => !s.is_empty(),
            Date(_) => true,
            Array(arr) => !arr.is_empty(),
            Object(obj) => !obj.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Date view of the value: dates as-is, `YYYY-MM-DD` and RFC 3339 strings parsed.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(*d),
            Value::String(s) => parse_date(s),
            _ => None,
        }
    }

    /// Equality used by `=` and `!=`.
    ///
    /// Integers and floats compare numerically; every other cross-type pair is unequal.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                int_float_cmp(*a, *b) == Some(Ordering::Equal)
            }
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (a, b) => a == b,
        }
    }

    /// Natural ordering between two values, `None` when they are incomparable.
    ///
    /// Null is never comparable, not even with itself.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => int_float_cmp(*a, *b),
            (Value::Float(a), Value::Integer(b)) => int_float_cmp(*b, *a).map(Ordering::reverse),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::String(b)) => parse_date(b).map(|b| a.cmp(&b)),
            (Value::String(a), Value::Date(b)) => parse_date(a).map(|a| a.cmp(b)),
            _ => None,
        }
    }

    /// Plain text of the value, as used for group headings and inline results.
    pub fn as_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Date(d) => format_date(d),
            Value::Array(items) => items
                .iter()
                .map(Value::as_string)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Object(_) => serde_json::Value::from(self.clone()).to_string(),
        }
    }
}

/// Exact comparison of an integer with a float, falling back to f64 when the
/// float has no decimal representation (NaN, infinities, out of range).
fn int_float_cmp(a: i64, b: f64) -> Option<Ordering> {
    match (Decimal::from_i64(a), Decimal::from_f64(b)) {
        (Some(ad), Some(bd)) => Some(ad.cmp(&bd)),
        _ => (a as f64).partial_cmp(&b),
    }
}

pub(crate) fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// `YYYY-MM-DD`, with ` HH:MM` appended when the time is not midnight.
pub(crate) fn format_date(d: &DateTime<Utc>) -> String {
    if d.num_seconds_from_midnight() == 0 && d.nanosecond() == 0 {
        d.format("%Y-%m-%d").to_string()
    } else {
        d.format("%Y-%m-%d %H:%M").to_string()
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Date(d) => serde_json::Value::String(d.to_rfc3339()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::Array(vec![]).is_truthy());
        assert!(Value::Integer(-3).is_truthy());
        assert!(Value::from("x").is_truthy());
    }

    #[test]
    fn numeric_cross_type_equality_is_exact() {
        assert!(Value::Integer(2).loose_eq(&Value::Float(2.0)));
        assert!(!Value::Integer(2).loose_eq(&Value::Float(2.5)));
        assert!(!Value::Integer(1).loose_eq(&Value::from("1")));
    }

    #[test]
    fn null_is_incomparable() {
        assert_eq!(Value::Null.compare(&Value::Integer(1)), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
    }

    #[test]
    fn date_strings_compare_with_dates() {
        let d = parse_date("2024-03-01").unwrap();
        assert_eq!(
            Value::Date(d).compare(&Value::from("2024-02-01")),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn json_conversion_keeps_integers() {
        let v = Value::from(serde_json::json!({"n": 3, "f": 1.5, "tags": ["a"]}));
        let Value::Object(map) = v else {
            panic!("expected object")
        };
        assert_eq!(map["n"], Value::Integer(3));
        assert_eq!(map["f"], Value::Float(1.5));
        assert_eq!(map["tags"], Value::Array(vec![Value::from("a")]));
    }
}
