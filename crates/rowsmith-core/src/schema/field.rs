use serde::{Deserialize, Serialize};
use std::fmt;

use crate::generate::value::Value;

/// The type tag of a field.
///
/// Every built-in type is a variant; any other name parses to `Custom` and is
/// resolved against the caller's custom type table when the generation plan
/// is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Int,
    Float,
    Boolean,
    Date,
    DateTime,
    Time,
    Enum,
    Email,
    Phone,
    Uuid,
    Name,
    Address,
    Ip,
    Static,
    Custom(String),
}

impl FieldType {
    /// Parse a type name. `hour` and `ipv4` are accepted as aliases.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" => FieldType::String,
            "int" => FieldType::Int,
            "float" => FieldType::Float,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "time" | "hour" => FieldType::Time,
            "enum" => FieldType::Enum,
            "email" => FieldType::Email,
            "phone" => FieldType::Phone,
            "uuid" => FieldType::Uuid,
            "name" => FieldType::Name,
            "address" => FieldType::Address,
            "ip" | "ipv4" => FieldType::Ip,
            "static" => FieldType::Static,
            _ => FieldType::Custom(name.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Time => "time",
            FieldType::Enum => "enum",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Uuid => "uuid",
            FieldType::Name => "name",
            FieldType::Address => "address",
            FieldType::Ip => "ip",
            FieldType::Static => "static",
            FieldType::Custom(name) => name,
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::parse(&name)
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A numeric constraint as written in the schema file. Integers stay exact
/// (`i64`) so bounds such as 999999999999 survive untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Int(i64),
    Float(f64),
}

impl Bound {
    pub fn as_f64(self) -> f64 {
        match self {
            Bound::Int(i) => i as f64,
            Bound::Float(f) => f,
        }
    }

    /// The bound as an integer, if it has no fractional part.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Bound::Int(i) => Some(i),
            Bound::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
            Bound::Float(_) => None,
        }
    }
}

/// One schema entry: a field name, its type, and the type's constraints.
///
/// Constraints irrelevant to the field's type are ignored. Key aliases
/// (`options`, `domain_list`, `pattern`) match the older schema files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Length of `string` values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Alphabet for `string` values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound>,
    /// Decimal places for `float` values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
    /// Options for `enum` fields.
    #[serde(default, alias = "options", skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<serde_json::Value>>,
    /// Email domains.
    #[serde(
        default,
        alias = "domain_list",
        alias = "domain",
        skip_serializing_if = "Option::is_none"
    )]
    pub domains: Option<Vec<String>>,
    /// Digit count for `phone` values without a format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digits: Option<usize>,
    /// Phone pattern; every `#` becomes a random digit.
    #[serde(default, alias = "pattern", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Literal for `static` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub pk: bool,
    /// Per-field override of the session null probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_probability: Option<f64>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            length: None,
            charset: None,
            min: None,
            max: None,
            decimals: None,
            start_year: None,
            end_year: None,
            values: None,
            domains: None,
            digits: None,
            format: None,
            value: None,
            nullable: false,
            unique: false,
            pk: false,
            null_probability: None,
        }
    }

    /// `unique` or `pk`.
    pub fn requires_unique(&self) -> bool {
        self.unique || self.pk
    }
}

/// Convert a schema literal (static value or enum option) into a `Value`.
///
/// Scalars keep their type; arrays and objects are carried as their JSON text.
pub fn literal_to_value(literal: &serde_json::Value) -> Value {
    match literal {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Value::owned(s.clone()),
        other => Value::owned(other.to_string()),
    }
}
