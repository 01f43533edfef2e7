use std::collections::{HashMap, HashSet};

use crate::generate::value::Value;

/// Default base ceiling on resampling attempts for one unique value.
pub const DEFAULT_MAX_UNIQUE_ATTEMPTS: usize = 1000;

/// Hard upper bound on the attempt budget, however large the remaining
/// domain estimate is.
const ATTEMPT_CEILING: usize = 1_000_000;

/// Tracks values already emitted for `unique`/`pk` fields.
///
/// One registry lives for exactly one generation session. The engine creates
/// it, threads it through row generation, and drops it when the dataset is
/// returned.
#[derive(Debug)]
pub struct UniquenessRegistry {
    /// Map from field name to set of seen value keys.
    seen: HashMap<String, HashSet<String>>,
    /// Minimum attempts before giving up on a single value.
    pub max_attempts: usize,
}

impl UniquenessRegistry {
    pub fn new() -> Self {
        Self::with_max_attempts(DEFAULT_MAX_UNIQUE_ATTEMPTS)
    }

    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self {
            seen: HashMap::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Record a value for a field. Returns true if it was new, false if it
    /// was already emitted in this session.
    pub fn try_insert(&mut self, field: &str, value: &Value) -> bool {
        let key = value.to_unique_key();
        match self.seen.get_mut(field) {
            Some(values) => values.insert(key),
            None => {
                self.seen.insert(field.to_string(), HashSet::from([key]));
                true
            }
        }
    }

    pub fn contains(&self, field: &str, value: &Value) -> bool {
        self.seen
            .get(field)
            .is_some_and(|values| values.contains(&value.to_unique_key()))
    }

    /// Number of distinct values recorded for a field.
    pub fn count(&self, field: &str) -> usize {
        self.seen.get(field).map(|s| s.len()).unwrap_or(0)
    }

    /// Attempt budget for the next value of a field.
    ///
    /// `max(max_attempts, 10 × remaining)` where `remaining` is the number of
    /// still-unused values in the field's domain, capped at a fixed ceiling.
    /// Returns 0 when the domain is known and already exhausted.
    pub fn attempt_budget(&self, field: &str, domain_size: Option<u128>) -> usize {
        match domain_size {
            Some(size) => {
                let used = self.count(field) as u128;
                if used >= size {
                    return 0;
                }
                let remaining = size - used;
                let scaled = remaining.saturating_mul(10).min(ATTEMPT_CEILING as u128) as usize;
                self.max_attempts.max(scaled)
            }
            None => self.max_attempts,
        }
    }
}

impl Default for UniquenessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn test_unique_tracking() {
        let mut registry = UniquenessRegistry::new();

        let v1 = Value::String(Cow::Owned("test@example.com".to_string()));
        assert!(registry.try_insert("email", &v1));

        // Same value should fail
        assert!(!registry.try_insert("email", &v1));
        assert!(registry.contains("email", &v1));

        // Different value should succeed
        let v2 = Value::String(Cow::Owned("other@example.com".to_string()));
        assert!(registry.try_insert("email", &v2));
        assert_eq!(registry.count("email"), 2);
    }

    #[test]
    fn test_fields_are_tracked_independently() {
        let mut registry = UniquenessRegistry::new();
        assert!(registry.try_insert("a", &Value::Int(7)));
        assert!(registry.try_insert("b", &Value::Int(7)));
        assert_eq!(registry.count("a"), 1);
        assert_eq!(registry.count("missing"), 0);
    }

    #[test]
    fn test_attempt_budget_exhausted_domain_is_zero() {
        let mut registry = UniquenessRegistry::new();
        for i in 1..=3 {
            registry.try_insert("id", &Value::Int(i));
        }
        assert_eq!(registry.attempt_budget("id", Some(3)), 0);
    }

    #[test]
    fn test_attempt_budget_scales_with_remaining_domain() {
        let registry = UniquenessRegistry::with_max_attempts(10);
        assert_eq!(registry.attempt_budget("id", Some(500)), 5000);
        assert_eq!(registry.attempt_budget("id", None), 10);
        assert_eq!(registry.attempt_budget("id", Some(u128::MAX)), ATTEMPT_CEILING);
    }
}
