use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical textual form for dates in every output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical textual form for datetimes in every output.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Canonical textual form for times of day in every output.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A generated value for one field of a row.
///
/// The `String` variant uses `Cow<'static, str>` so that values drawn from
/// static tables (the default email domains, for instance) are held as
/// `&'static str` borrows while generated text is stored owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Uuid(Uuid),
}

impl Value {
    pub fn owned(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }

    /// Plain text form used by CSV, XML, and terminal previews.
    ///
    /// Nulls render as the empty string; temporal values use the canonical
    /// ISO forms.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.to_string(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
            Value::DateTime(ts) => ts.format(DATETIME_FORMAT).to_string(),
            Value::Time(t) => t.format(TIME_FORMAT).to_string(),
            Value::Uuid(u) => u.to_string(),
        }
    }

    /// Get a string representation for uniqueness tracking.
    ///
    /// The variant tag is part of the key so `Int(1)` and `String("1")`
    /// produced by a custom generator never collide.
    pub fn to_unique_key(&self) -> String {
        match self {
            Value::Null => "__NULL__".to_string(),
            Value::Bool(b) => format!("b:{}", b),
            Value::Int(i) => format!("i:{}", i),
            Value::Float(f) => format!("f:{:?}", f),
            Value::String(s) => format!("s:{}", s),
            Value::Date(d) => format!("d:{}", d),
            Value::DateTime(ts) => format!("dt:{}", ts),
            Value::Time(t) => format!("t:{}", t),
            Value::Uuid(u) => format!("u:{}", u),
        }
    }

    /// True for values whose natural literal is a quoted string in SQL and
    /// source code: text, temporal values, and UUIDs.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Value::String(_) | Value::Date(_) | Value::DateTime(_) | Value::Time(_) | Value::Uuid(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            other => write!(f, "{}", other.to_text()),
        }
    }
}

/// Float literal that always carries a decimal point or exponent, so code
/// emitters never turn `3.0` into the integer `3`.
pub fn float_literal(f: f64) -> String {
    format!("{:?}", f)
}
