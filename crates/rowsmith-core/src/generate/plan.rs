use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Result, RowsmithError};
use crate::generate::custom::{CustomHandle, CustomTypes};
use crate::generate::value::Value;
use crate::schema::{literal_to_value, Bound, FieldSpec, FieldType, Schema};

pub const DEFAULT_STRING_LENGTH: usize = 10;
pub const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const DEFAULT_INT_RANGE: (i64, i64) = (0, 1000);
pub const DEFAULT_FLOAT_RANGE: (f64, f64) = (0.0, 1000.0);
pub const DEFAULT_DECIMALS: u32 = 2;
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2000, 2024);
pub const DEFAULT_PHONE_DIGITS: usize = 8;
pub const DEFAULT_EMAIL_DOMAINS: &[&str] = &["example.com", "test.org", "demo.net"];
/// Length of the random local part of generated email addresses.
pub const EMAIL_LOCAL_LENGTH: u32 = 8;

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// The resolved generation request for a whole schema.
///
/// Built once before any row is generated. Every constraint has been
/// validated and every default applied, so the engine never re-reads the
/// schema.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub fields: Vec<FieldPlan>,
}

/// Generation request for a single field.
#[derive(Debug, Clone)]
pub struct FieldPlan {
    pub name: String,
    pub strategy: FieldStrategy,
    /// Probability of producing NULL. Zero for non-nullable, `pk`, and
    /// `static` fields.
    pub null_probability: f64,
    /// Values must not repeat within a session.
    pub unique: bool,
    /// Primary key: a generated NULL is a rejected draw, not a value.
    pub primary_key: bool,
}

/// How a field's value is produced. Constraints are captured by value.
#[derive(Debug, Clone)]
pub enum FieldStrategy {
    Text {
        length: usize,
        charset: Vec<char>,
    },
    Int {
        min: i64,
        max: i64,
    },
    /// Uniform over the multiples of `1 / scale` in `[min_units, max_units]`,
    /// so rounding can never push a value outside the declared range.
    Float {
        min_units: i64,
        max_units: i64,
        scale: f64,
    },
    Boolean,
    Date {
        start: NaiveDate,
        end: NaiveDate,
    },
    DateTime {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Time,
    Enum {
        values: Vec<Value>,
    },
    Email {
        domains: Vec<Cow<'static, str>>,
    },
    Phone(PhoneFormat),
    Uuid,
    Name,
    Address,
    Ip,
    Static(Value),
    Custom {
        type_name: String,
        handle: CustomHandle,
        spec: FieldSpec,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhoneFormat {
    Digits(usize),
    /// Every `#` is replaced by a random digit.
    Pattern(String),
}

impl FieldStrategy {
    /// True when the strategy can hand back a literal NULL on its own.
    fn has_null_literal(&self) -> bool {
        match self {
            FieldStrategy::Enum { values } => values.iter().any(Value::is_null),
            FieldStrategy::Static(value) => value.is_null(),
            _ => false,
        }
    }

    /// Number of distinct values the strategy can produce, when it is known
    /// and fits in a `u128`.
    pub fn domain_size(&self) -> Option<u128> {
        match self {
            FieldStrategy::Text { length, charset } => {
                (0..*length).try_fold(1u128, |acc, _| acc.checked_mul(charset.len() as u128))
            }
            FieldStrategy::Int { min, max } => Some((*max as i128 - *min as i128 + 1) as u128),
            FieldStrategy::Float {
                min_units,
                max_units,
                ..
            } => Some((*max_units as i128 - *min_units as i128 + 1) as u128),
            FieldStrategy::Boolean => Some(2),
            FieldStrategy::Date { start, end } => {
                Some(((*end - *start).num_days() + 1).max(0) as u128)
            }
            FieldStrategy::DateTime { start, end } => {
                Some(((*end - *start).num_seconds() + 1).max(0) as u128)
            }
            FieldStrategy::Time => Some(86_400),
            FieldStrategy::Enum { values } => {
                let distinct: HashSet<String> = values.iter().map(Value::to_unique_key).collect();
                Some(distinct.len() as u128)
            }
            FieldStrategy::Email { domains } => {
                26u128.checked_pow(EMAIL_LOCAL_LENGTH)?.checked_mul(domains.len() as u128)
            }
            FieldStrategy::Phone(PhoneFormat::Digits(n)) => 10u128.checked_pow(*n as u32),
            FieldStrategy::Phone(PhoneFormat::Pattern(p)) => {
                10u128.checked_pow(p.matches('#').count() as u32)
            }
            FieldStrategy::Ip => Some(1 << 32),
            FieldStrategy::Static(_) => Some(1),
            FieldStrategy::Custom { handle, .. } => handle.domain_size(),
            FieldStrategy::Uuid | FieldStrategy::Name | FieldStrategy::Address => None,
        }
    }
}

impl GenerationPlan {
    /// Resolve a schema into a plan.
    ///
    /// `default_null_probability` applies to nullable fields that do not set
    /// their own `null_probability`.
    pub fn build(
        schema: &Schema,
        default_null_probability: f64,
        custom_types: &CustomTypes,
    ) -> Result<Self> {
        schema.validate()?;
        if !(0.0..=1.0).contains(&default_null_probability) {
            return Err(RowsmithError::config(format!(
                "null_probability must be between 0.0 and 1.0, got {}",
                default_null_probability
            )));
        }

        let mut fields = Vec::with_capacity(schema.fields.len());
        for spec in &schema.fields {
            let strategy = resolve_strategy(spec, custom_types)?;
            let is_static = matches!(strategy, FieldStrategy::Static(_));
            if spec.pk && strategy.has_null_literal() {
                return Err(RowsmithError::schema(
                    &spec.name,
                    "primary key fields cannot list null as a possible value",
                ));
            }

            let null_probability = match spec.null_probability {
                Some(p) if !(0.0..=1.0).contains(&p) => {
                    return Err(RowsmithError::schema(
                        &spec.name,
                        format!("null_probability must be between 0.0 and 1.0, got {}", p),
                    ));
                }
                Some(p) => p,
                None => default_null_probability,
            };
            let nullable = spec.nullable && !spec.pk && !is_static;

            fields.push(FieldPlan {
                name: spec.name.clone(),
                strategy,
                null_probability: if nullable { null_probability } else { 0.0 },
                unique: spec.requires_unique() && !is_static,
                primary_key: spec.pk,
            });
        }

        tracing::debug!(fields = fields.len(), "Built generation plan");
        Ok(Self { fields })
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

fn resolve_strategy(spec: &FieldSpec, custom_types: &CustomTypes) -> Result<FieldStrategy> {
    let name = spec.name.as_str();
    let strategy = match &spec.field_type {
        FieldType::String => {
            let charset: Vec<char> = match spec.charset.as_deref() {
                Some(cs) => {
                    let mut seen = HashSet::new();
                    cs.chars().filter(|c| seen.insert(*c)).collect()
                }
                None => DEFAULT_CHARSET.chars().collect(),
            };
            if charset.is_empty() {
                return Err(RowsmithError::schema(name, "charset must not be empty"));
            }
            FieldStrategy::Text {
                length: spec.length.unwrap_or(DEFAULT_STRING_LENGTH),
                charset,
            }
        }
        FieldType::Int => {
            let min = int_bound(name, "min", spec.min)?.unwrap_or(DEFAULT_INT_RANGE.0);
            let max = int_bound(name, "max", spec.max)?.unwrap_or(DEFAULT_INT_RANGE.1);
            if min > max {
                return Err(inverted_range(name, min, max));
            }
            FieldStrategy::Int { min, max }
        }
        FieldType::Float => float_strategy(spec)?,
        FieldType::Boolean => FieldStrategy::Boolean,
        FieldType::Date => {
            let (start, end) = date_range(spec)?;
            FieldStrategy::Date { start, end }
        }
        FieldType::DateTime => {
            let (start, end) = date_range(spec)?;
            let (Some(start), Some(end)) = (start.and_hms_opt(0, 0, 0), end.and_hms_opt(23, 59, 59))
            else {
                return Err(RowsmithError::schema(name, "year range is out of bounds"));
            };
            FieldStrategy::DateTime { start, end }
        }
        FieldType::Time => FieldStrategy::Time,
        FieldType::Enum => {
            let Some(values) = spec.values.as_ref() else {
                return Err(RowsmithError::schema(
                    name,
                    "enum fields require a 'values' list",
                ));
            };
            if values.is_empty() {
                return Err(RowsmithError::config(format!(
                    "enum field '{}' has no options to choose from",
                    name
                )));
            }
            FieldStrategy::Enum {
                values: values.iter().map(literal_to_value).collect(),
            }
        }
        FieldType::Email => {
            let domains: Vec<Cow<'static, str>> = match spec.domains.as_ref() {
                Some(list) => list.iter().map(|d| Cow::Owned(d.clone())).collect(),
                None => DEFAULT_EMAIL_DOMAINS.iter().map(|d| Cow::Borrowed(*d)).collect(),
            };
            if domains.is_empty() {
                return Err(RowsmithError::schema(name, "domain list must not be empty"));
            }
            FieldStrategy::Email { domains }
        }
        FieldType::Phone => match (&spec.format, spec.digits) {
            (Some(pattern), _) => FieldStrategy::Phone(PhoneFormat::Pattern(pattern.clone())),
            (None, Some(0)) => {
                return Err(RowsmithError::schema(name, "digits must be at least 1"));
            }
            (None, digits) => {
                FieldStrategy::Phone(PhoneFormat::Digits(digits.unwrap_or(DEFAULT_PHONE_DIGITS)))
            }
        },
        FieldType::Uuid => FieldStrategy::Uuid,
        FieldType::Name => FieldStrategy::Name,
        FieldType::Address => FieldStrategy::Address,
        FieldType::Ip => FieldStrategy::Ip,
        FieldType::Static => {
            let Some(literal) = spec.value.as_ref() else {
                return Err(RowsmithError::schema(
                    name,
                    "static fields require a 'value'",
                ));
            };
            FieldStrategy::Static(literal_to_value(literal))
        }
        FieldType::Custom(type_name) => match custom_types.get(type_name) {
            Some(handle) => FieldStrategy::Custom {
                type_name: type_name.clone(),
                handle: handle.clone(),
                spec: spec.clone(),
            },
            None => {
                return Err(RowsmithError::config(format!(
                    "Unknown field type '{}' for field '{}'",
                    type_name, name
                )));
            }
        },
    };
    Ok(strategy)
}

fn int_bound(field: &str, key: &str, bound: Option<Bound>) -> Result<Option<i64>> {
    match bound {
        None => Ok(None),
        Some(b) => b.as_i64().map(Some).ok_or_else(|| {
            RowsmithError::schema(
                field,
                format!("'{}' must be an integer for int fields, got {}", key, b.as_f64()),
            )
        }),
    }
}

fn inverted_range(field: &str, min: impl std::fmt::Display, max: impl std::fmt::Display) -> RowsmithError {
    RowsmithError::schema(field, format!("min ({}) is greater than max ({})", min, max))
}

fn float_strategy(spec: &FieldSpec) -> Result<FieldStrategy> {
    let name = spec.name.as_str();
    let min = spec.min.map(Bound::as_f64).unwrap_or(DEFAULT_FLOAT_RANGE.0);
    let max = spec.max.map(Bound::as_f64).unwrap_or(DEFAULT_FLOAT_RANGE.1);
    if !min.is_finite() || !max.is_finite() {
        return Err(RowsmithError::schema(name, "float bounds must be finite"));
    }
    if min > max {
        return Err(inverted_range(name, min, max));
    }

    let decimals = spec.decimals.unwrap_or(DEFAULT_DECIMALS);
    let scale = 10f64.powi(decimals as i32);
    if (min * scale).abs() > MAX_EXACT_F64 || (max * scale).abs() > MAX_EXACT_F64 {
        return Err(RowsmithError::schema(
            name,
            format!("range [{}, {}] is too wide for {} decimals", min, max, decimals),
        ));
    }

    let mut min_units = (min * scale).ceil() as i64;
    if (min_units as f64) / scale < min {
        min_units += 1;
    }
    let mut max_units = (max * scale).floor() as i64;
    if (max_units as f64) / scale > max {
        max_units -= 1;
    }
    if min_units > max_units {
        return Err(RowsmithError::schema(
            name,
            format!("no value with {} decimals lies within [{}, {}]", decimals, min, max),
        ));
    }

    Ok(FieldStrategy::Float {
        min_units,
        max_units,
        scale,
    })
}

fn date_range(spec: &FieldSpec) -> Result<(NaiveDate, NaiveDate)> {
    let name = spec.name.as_str();
    let start_year = spec.start_year.unwrap_or(DEFAULT_YEAR_RANGE.0);
    let end_year = spec.end_year.unwrap_or(DEFAULT_YEAR_RANGE.1);
    if start_year > end_year {
        return Err(RowsmithError::schema(
            name,
            format!(
                "start_year ({}) is greater than end_year ({})",
                start_year, end_year
            ),
        ));
    }
    let start = NaiveDate::from_ymd_opt(start_year, 1, 1);
    let end = NaiveDate::from_ymd_opt(end_year, 12, 31);
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(RowsmithError::schema(
            name,
            format!("year range {}..{} is out of bounds", start_year, end_year),
        )),
    }
}
