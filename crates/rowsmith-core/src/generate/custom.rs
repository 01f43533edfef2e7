//! # Custom Types
//!
//! A custom type is any field type name that is not built in. Callers
//! register a generator per name, either in code:
//!
//! ```
//! use rowsmith_core::generate::custom::CustomTypes;
//! use rowsmith_core::generate::value::Value;
//! use rand::Rng;
//!
//! let mut types = CustomTypes::new();
//! types.register_fn("custom_id", |_field, rng| {
//!     Value::owned(format!("ID-{:05}", rng.random_range(0..100_000)))
//! });
//! assert!(types.contains("custom_id"));
//! ```
//!
//! or declaratively through `[types.<name>]` in `rowsmith.toml` (value lists
//! with optional weights, or `#`/`?`/`*` patterns).
//!
//! Custom fields go through the same null and uniqueness policy as built-in
//! fields.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::error::{Result, RowsmithError};
use crate::schema::FieldSpec;
use crate::generate::value::Value;

const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A generator for one custom field type.
pub trait CustomGenerator: Send + Sync {
    fn generate(&self, field: &FieldSpec, rng: &mut dyn RngCore) -> Result<Value>;

    /// Number of distinct values this generator can produce, if known.
    /// Used to bound uniqueness retries.
    fn domain_size(&self) -> Option<u128> {
        None
    }
}

/// Adapter so plain closures can be registered with `register_fn`.
struct FnGenerator<F>(F);

impl<F> CustomGenerator for FnGenerator<F>
where
    F: Fn(&FieldSpec, &mut dyn RngCore) -> Value + Send + Sync,
{
    fn generate(&self, field: &FieldSpec, rng: &mut dyn RngCore) -> Result<Value> {
        Ok((self.0)(field, rng))
    }
}

/// Shared handle to a registered generator.
#[derive(Clone)]
pub struct CustomHandle(Arc<dyn CustomGenerator>);

impl CustomHandle {
    pub fn generate(&self, field: &FieldSpec, rng: &mut dyn RngCore) -> Result<Value> {
        self.0.generate(field, rng)
    }

    pub fn domain_size(&self) -> Option<u128> {
        self.0.domain_size()
    }
}

impl fmt::Debug for CustomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomHandle(..)")
    }
}

/// Name → generator table for custom field types.
#[derive(Clone, Default)]
pub struct CustomTypes {
    generators: HashMap<String, CustomHandle>,
}

impl CustomTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<G: CustomGenerator + 'static>(&mut self, name: impl Into<String>, generator: G) {
        self.generators
            .insert(name.into(), CustomHandle(Arc::new(generator)));
    }

    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&FieldSpec, &mut dyn RngCore) -> Value + Send + Sync + 'static,
    {
        self.register(name, FnGenerator(f));
    }

    pub fn get(&self, name: &str) -> Option<&CustomHandle> {
        self.generators.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Merge another table into this one; entries in `other` win.
    pub fn extend(&mut self, other: CustomTypes) {
        self.generators.extend(other.generators);
    }
}

impl fmt::Debug for CustomTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTypes")
            .field("names", &self.names())
            .finish()
    }
}

/// Pick from a fixed list of values, optionally weighted.
#[derive(Debug, Clone)]
pub struct ValueListGenerator {
    values: Vec<String>,
    weights: Option<Vec<f64>>,
}

impl ValueListGenerator {
    pub fn new(values: Vec<String>, weights: Option<Vec<f64>>) -> Result<Self> {
        if values.is_empty() {
            return Err(RowsmithError::config("value list must not be empty"));
        }
        if let Some(ref w) = weights {
            if w.len() != values.len() {
                return Err(RowsmithError::config(format!(
                    "weights has {} entries but values has {} entries. They must be the same length.",
                    w.len(),
                    values.len()
                )));
            }
            if w.iter().all(|weight| *weight <= 0.0) {
                tracing::warn!("All weights are zero or negative; falling back to uniform selection");
            }
        }
        Ok(Self { values, weights })
    }
}

impl CustomGenerator for ValueListGenerator {
    fn generate(&self, _field: &FieldSpec, rng: &mut dyn RngCore) -> Result<Value> {
        let picked = match self.weights {
            Some(ref w) => weighted_pick(&self.values, w, rng),
            None => &self.values[rng.random_range(0..self.values.len())],
        };
        Ok(Value::owned(picked.clone()))
    }

    fn domain_size(&self) -> Option<u128> {
        let mut distinct: Vec<&String> = self.values.iter().collect();
        distinct.sort_unstable();
        distinct.dedup();
        Some(distinct.len() as u128)
    }
}

/// Fill a template: `#` → digit, `?` → uppercase letter, `*` → alphanumeric.
/// Every other character is copied verbatim.
#[derive(Debug, Clone)]
pub struct PatternGenerator {
    pattern: String,
}

impl PatternGenerator {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl CustomGenerator for PatternGenerator {
    fn generate(&self, _field: &FieldSpec, rng: &mut dyn RngCore) -> Result<Value> {
        Ok(Value::owned(fill_pattern(&self.pattern, rng)))
    }

    fn domain_size(&self) -> Option<u128> {
        self.pattern.chars().try_fold(1u128, |acc, c| match c {
            '#' => acc.checked_mul(10),
            '?' => acc.checked_mul(UPPERCASE.len() as u128),
            '*' => acc.checked_mul(ALPHANUMERIC.len() as u128),
            _ => Some(acc),
        })
    }
}

fn fill_pattern(pattern: &str, rng: &mut dyn RngCore) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.random_range(0..10u8)),
            '?' => UPPERCASE[rng.random_range(0..UPPERCASE.len())] as char,
            '*' => ALPHANUMERIC[rng.random_range(0..ALPHANUMERIC.len())] as char,
            other => other,
        })
        .collect()
}

/// Weighted random selection from a value list.
///
/// Uses cumulative distribution for O(n) selection.
/// Edge cases:
/// - All weights zero → uniform fallback
/// - Negative weights → clamped to zero
/// - Single value → always returns it
fn weighted_pick<'a>(values: &'a [String], weights: &[f64], rng: &mut dyn RngCore) -> &'a String {
    if values.len() == 1 {
        return &values[0];
    }

    // Clamp negative weights to zero
    let clamped: Vec<f64> = weights.iter().map(|w| w.max(0.0)).collect();
    let total: f64 = clamped.iter().sum();

    if total <= 0.0 {
        return &values[rng.random_range(0..values.len())];
    }

    let roll: f64 = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, w) in clamped.iter().enumerate() {
        cumulative += w;
        if roll < cumulative {
            return &values[i];
        }
    }

    // Floating-point edge case: fall through to the last positive weight
    let last = clamped.iter().rposition(|w| *w > 0.0).unwrap_or(values.len() - 1);
    &values[last]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn field() -> FieldSpec {
        FieldSpec::new("x", FieldType::Custom("x".to_string()))
    }

    #[test]
    fn test_register_fn_and_generate() {
        let mut types = CustomTypes::new();
        types.register_fn("answer", |_f, _rng| Value::Int(42));
        let mut rng = StdRng::seed_from_u64(1);
        let value = types
            .get("answer")
            .unwrap()
            .generate(&field(), &mut rng)
            .unwrap();
        assert_eq!(value, Value::Int(42));
        assert!(types.get("missing").is_none());
    }

    #[test]
    fn test_weighted_pick_all_zeros_uniform_fallback() {
        let values = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let weights = vec![0.0, 0.0, 0.0];
        let mut rng = StdRng::seed_from_u64(42);

        let mut results = HashSet::new();
        for _ in 0..100 {
            results.insert(weighted_pick(&values, &weights, &mut rng).clone());
        }
        assert!(results.len() > 1, "Uniform fallback should produce variety");
    }

    #[test]
    fn test_weighted_pick_negative_weights_clamped() {
        let values = vec!["a".to_string(), "b".to_string()];
        let weights = vec![-1.0, 1.0];
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            assert_eq!(weighted_pick(&values, &weights, &mut rng), "b");
        }
    }

    #[test]
    fn test_value_list_weighted_distribution() {
        let generator = ValueListGenerator::new(
            vec!["a".to_string(), "b".to_string()],
            Some(vec![0.9, 0.1]),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let count_a = (0..1000)
            .filter(|_| generator.generate(&field(), &mut rng).unwrap() == Value::owned("a".into()))
            .count();
        assert!(count_a > 700, "Expected >700 'a' values with 0.9 weight, got {}", count_a);
    }

    #[test]
    fn test_value_list_rejects_mismatched_weights() {
        let result = ValueListGenerator::new(vec!["a".to_string()], Some(vec![0.5, 0.5]));
        assert!(matches!(result, Err(RowsmithError::Configuration { .. })));
    }

    #[test]
    fn test_value_list_domain_counts_distinct() {
        let generator = ValueListGenerator::new(
            vec!["CORP".to_string(), "LAB".to_string(), "CORP".to_string()],
            None,
        )
        .unwrap();
        assert_eq!(generator.domain_size(), Some(2));
    }

    #[test]
    fn test_pattern_generator() {
        let generator = PatternGenerator::new("EMP-##?*");
        let mut rng = StdRng::seed_from_u64(3);
        let value = generator.generate(&field(), &mut rng).unwrap();
        let text = value.as_string().unwrap().to_string();
        assert_eq!(text.len(), 8);
        assert!(text.starts_with("EMP-"));
        assert!(text[4..6].chars().all(|c| c.is_ascii_digit()));
        assert!(text[6..7].chars().all(|c| c.is_ascii_uppercase()));
        assert_eq!(generator.domain_size(), Some(100 * 26 * 62));
    }
}
