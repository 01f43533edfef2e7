use std::sync::Arc;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{Result, RowsmithError};
use crate::generate::corpus::{FakeCorpus, TextCorpus};
use crate::generate::custom::{CustomGenerator, CustomTypes};
use crate::generate::plan::{FieldPlan, GenerationPlan};
use crate::generate::providers::generate_value;
use crate::generate::unique::{UniquenessRegistry, DEFAULT_MAX_UNIQUE_ATTEMPTS};
use crate::generate::value::Value;
use crate::schema::Schema;

/// One generated record. An IndexMap (not HashMap) so keys stay in schema
/// order for every output format.
pub type Row = IndexMap<String, Value>;

/// Rows between progress callbacks.
const PROGRESS_BATCH_SIZE: usize = 100;

/// Default probability that a nullable field comes out NULL.
pub const DEFAULT_NULL_PROBABILITY: f64 = 0.1;

/// The rows produced by one generation session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names, taken from the first row's keys.
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Session-level knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Fixed seed for reproducible output. A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Null probability for nullable fields without their own override.
    pub null_probability: f64,
    /// Base ceiling on resampling attempts for unique fields.
    pub max_unique_attempts: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            seed: None,
            null_probability: DEFAULT_NULL_PROBABILITY,
            max_unique_attempts: DEFAULT_MAX_UNIQUE_ATTEMPTS,
        }
    }
}

impl GenerationOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Repeats row generation `count` times against one schema.
///
/// Each call to [`DatasetGenerator::generate`] is an independent session
/// with its own RNG and its own uniqueness registry.
#[derive(Clone)]
pub struct DatasetGenerator {
    options: GenerationOptions,
    custom_types: CustomTypes,
    corpus: Arc<dyn TextCorpus>,
}

impl Default for DatasetGenerator {
    fn default() -> Self {
        Self::new(GenerationOptions::default())
    }
}

impl DatasetGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self {
            options,
            custom_types: CustomTypes::new(),
            corpus: Arc::new(FakeCorpus),
        }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn with_custom_type<G: CustomGenerator + 'static>(
        mut self,
        name: impl Into<String>,
        generator: G,
    ) -> Self {
        self.custom_types.register(name, generator);
        self
    }

    pub fn with_custom_types(mut self, types: CustomTypes) -> Self {
        self.custom_types.extend(types);
        self
    }

    /// Replace the text source used by `name` and `address` fields.
    pub fn with_corpus<C: TextCorpus + 'static>(mut self, corpus: C) -> Self {
        self.corpus = Arc::new(corpus);
        self
    }

    /// Resolve the schema into a generation plan without generating rows.
    pub fn plan(&self, schema: &Schema) -> Result<GenerationPlan> {
        GenerationPlan::build(schema, self.options.null_probability, &self.custom_types)
    }

    pub fn generate(&self, schema: &Schema, count: usize) -> Result<Dataset> {
        self.generate_with_progress(schema, count, None)
    }

    /// Generate `count` rows, calling `progress_callback(done, total)` every
    /// 100 rows and once at the end.
    pub fn generate_with_progress(
        &self,
        schema: &Schema,
        count: usize,
        progress_callback: Option<&dyn Fn(usize, usize)>,
    ) -> Result<Dataset> {
        let plan = self.plan(schema)?;

        let seed = match self.options.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::rng().random();
                debug!(seed, "No seed given; drew a random one");
                seed
            }
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let mut registry = UniquenessRegistry::with_max_attempts(self.options.max_unique_attempts);
        debug!(rows = count, fields = plan.fields.len(), seed, "Starting generation session");

        let mut rows = Vec::with_capacity(count);
        for row_index in 0..count {
            let row = generate_row(&plan, &mut rng, &mut registry, self.corpus.as_ref(), row_index)?;
            rows.push(row);

            // Report every PROGRESS_BATCH_SIZE rows and on the last one
            if let Some(cb) = progress_callback {
                let done = row_index + 1;
                if done.is_multiple_of(PROGRESS_BATCH_SIZE) || done == count {
                    cb(done, count);
                }
            }
        }

        Ok(Dataset::new(rows))
    }
}

/// Generate a single row in plan order.
///
/// Nullable fields roll against their null probability first and skip the
/// value generator entirely on a hit. Unique fields resample until the
/// registry accepts the candidate or the attempt budget runs out.
pub fn generate_row(
    plan: &GenerationPlan,
    rng: &mut StdRng,
    registry: &mut UniquenessRegistry,
    corpus: &dyn TextCorpus,
    row_index: usize,
) -> Result<Row> {
    let mut row = Row::with_capacity(plan.fields.len());

    for field in &plan.fields {
        if field.null_probability > 0.0 && rng.random_bool(field.null_probability) {
            row.insert(field.name.clone(), Value::Null);
            continue;
        }

        let value = if field.unique {
            generate_unique(field, rng, registry, corpus, row_index)?
        } else {
            generate_value(&field.strategy, rng, corpus)?
        };
        row.insert(field.name.clone(), value);
    }

    Ok(row)
}

fn generate_unique(
    field: &FieldPlan,
    rng: &mut StdRng,
    registry: &mut UniquenessRegistry,
    corpus: &dyn TextCorpus,
    row_index: usize,
) -> Result<Value> {
    let budget = registry.attempt_budget(&field.name, field.strategy.domain_size());

    for _ in 0..budget {
        let candidate = generate_value(&field.strategy, rng, corpus)?;
        // A custom generator may hand back NULL. It never claims a unique
        // slot, and a primary key must draw again.
        if candidate.is_null() {
            if field.primary_key {
                continue;
            }
            return Ok(candidate);
        }
        if registry.try_insert(&field.name, &candidate) {
            return Ok(candidate);
        }
    }

    Err(RowsmithError::ResourceExhausted {
        field: field.name.clone(),
        row_index,
        attempts: budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Bound, FieldSpec, FieldType};
    use std::cell::RefCell;
    use std::collections::HashSet;

    fn seeded(seed: u64) -> DatasetGenerator {
        DatasetGenerator::new(GenerationOptions::default().with_seed(seed))
    }

    fn int_field(name: &str, min: i64, max: i64) -> FieldSpec {
        let mut field = FieldSpec::new(name, FieldType::Int);
        field.min = Some(Bound::Int(min));
        field.max = Some(Bound::Int(max));
        field
    }

    #[test]
    fn test_zero_rows_is_empty_dataset() {
        let schema = Schema::new(vec![FieldSpec::new("a", FieldType::Int)]);
        let dataset = seeded(1).generate(&schema, 0).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.columns().is_empty());
    }

    #[test]
    fn test_rows_follow_schema_order() {
        let schema = Schema::new(vec![
            FieldSpec::new("zeta", FieldType::Boolean),
            FieldSpec::new("alpha", FieldType::Uuid),
            FieldSpec::new("mid", FieldType::Time),
        ]);
        let dataset = seeded(1).generate(&schema, 5).unwrap();
        for row in &dataset {
            let keys: Vec<&str> = row.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        }
    }

    #[test]
    fn test_unique_field_exhausts_small_domain() {
        let mut field = int_field("id", 1, 3);
        field.unique = true;
        let schema = Schema::new(vec![field]);
        match seeded(7).generate(&schema, 5) {
            Err(RowsmithError::ResourceExhausted {
                field, row_index, ..
            }) => {
                assert_eq!(field, "id");
                assert_eq!(row_index, 3);
            }
            other => panic!("expected ResourceExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_unique_field_can_fill_entire_domain() {
        let mut field = int_field("id", 1, 50);
        field.pk = true;
        let schema = Schema::new(vec![field]);
        let dataset = seeded(7).generate(&schema, 50).unwrap();
        let ids: HashSet<i64> = dataset.iter().filter_map(|r| r["id"].as_int()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let schema = Schema::new(vec![
            FieldSpec::new("name", FieldType::Name),
            FieldSpec::new("id", FieldType::Uuid),
            FieldSpec::new("when", FieldType::DateTime),
        ]);
        let a = seeded(99).generate(&schema, 20).unwrap();
        let b = seeded(99).generate(&schema, 20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_type_goes_through_unique_policy() {
        let mut field = FieldSpec::new("code", FieldType::parse("tiny"));
        field.unique = true;
        let schema = Schema::new(vec![field]);
        let mut types = CustomTypes::new();
        types.register_fn("tiny", |_field, rng| Value::Int(rng.random_range(0..2)));
        let generator = seeded(3).with_custom_types(types);
        assert!(generator.generate(&schema, 2).is_ok());
        assert!(matches!(
            generator.generate(&schema, 3),
            Err(RowsmithError::ResourceExhausted { .. })
        ));
    }

    #[test]
    fn test_pk_custom_type_never_yields_null() {
        let mut field = FieldSpec::new("code", FieldType::parse("sparse"));
        field.pk = true;
        let schema = Schema::new(vec![field]);
        let mut types = CustomTypes::new();
        types.register_fn("sparse", |_field, rng| {
            if rng.random_bool(0.5) {
                Value::Null
            } else {
                Value::Int(rng.random_range(0..1_000_000))
            }
        });
        let dataset = seeded(5).with_custom_types(types).generate(&schema, 200).unwrap();
        let ids: HashSet<i64> = dataset.iter().filter_map(|r| r["code"].as_int()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_pk_custom_type_that_only_yields_null_exhausts() {
        let mut field = FieldSpec::new("code", FieldType::parse("void"));
        field.pk = true;
        let schema = Schema::new(vec![field]);
        let mut types = CustomTypes::new();
        types.register_fn("void", |_field, _rng| Value::Null);
        assert!(matches!(
            seeded(5).with_custom_types(types).generate(&schema, 1),
            Err(RowsmithError::ResourceExhausted { row_index: 0, .. })
        ));
    }

    #[test]
    fn test_unique_float_beyond_ten_decimals() {
        let mut field = FieldSpec::new("f", FieldType::Float);
        field.min = Some(Bound::Float(0.0));
        field.max = Some(Bound::Float(1e-11));
        field.decimals = Some(13);
        field.unique = true;
        let schema = Schema::new(vec![field]);
        let dataset = seeded(8).generate(&schema, 50).unwrap();
        let keys: HashSet<u64> = dataset
            .iter()
            .filter_map(|r| r["f"].as_float())
            .map(f64::to_bits)
            .collect();
        assert_eq!(keys.len(), 50);
    }

    #[test]
    fn test_progress_callback_batches() {
        let schema = Schema::new(vec![FieldSpec::new("a", FieldType::Boolean)]);
        let calls = RefCell::new(Vec::new());
        let cb = |done: usize, total: usize| calls.borrow_mut().push((done, total));
        seeded(1)
            .generate_with_progress(&schema, 250, Some(&cb))
            .unwrap();
        assert_eq!(calls.into_inner(), vec![(100, 250), (200, 250), (250, 250)]);
    }
}
