//! # Configuration File Parser
//!
//! Reads and parses `rowsmith.toml`, the optional configuration file that
//! supplies defaults the CLI would otherwise take as flags:
//!
//! - `[generate]`: row count, seed, null probability, uniqueness attempts
//! - `[output]`: table name, SQL dialect, code language, format, transaction
//! - `[types.<name>]`: custom field types built from value lists or patterns
//!
//! Example `rowsmith.toml`:
//!
//! ```toml
//! [generate]
//! rows = 500
//! seed = 42
//! null_probability = 0.1
//!
//! [output]
//! table = "device"
//! dialect = "sqlserver"
//! transaction = true
//!
//! [types.department]
//! values = ["Sales", "Engineering", "Support"]
//! weights = [0.3, 0.5, 0.2]
//!
//! [types.badge]
//! pattern = "EMP-####"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::code::Language;
use crate::error::{Result, RowsmithError};
use crate::generate::custom::{CustomTypes, PatternGenerator, ValueListGenerator};
use crate::generate::engine::GenerationOptions;
use crate::output::ExportFormat;
use crate::schema::FieldType;
use crate::sql::Dialect;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "rowsmith.toml";

/// Top-level rowsmith.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RowsmithConfig {
    pub generate: GenerateConfig,
    pub output: OutputConfig,
    /// Custom field types, keyed by type name.
    pub types: BTreeMap<String, TypeConfig>,
}

/// Default generation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Default number of rows.
    pub rows: Option<usize>,
    /// Fixed random seed for deterministic generation.
    pub seed: Option<u64>,
    /// Null probability for nullable fields.
    pub null_probability: Option<f64>,
    /// Base ceiling on resampling attempts for unique fields.
    pub max_unique_attempts: Option<usize>,
}

/// Default output settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Table or collection name for inserts, XML root, and worksheet name.
    pub table: Option<String>,
    pub dialect: Option<String>,
    pub language: Option<String>,
    pub format: Option<String>,
    /// Wrap SQL output in a transaction block.
    pub transaction: Option<bool>,
    /// Prepend a CREATE TABLE statement to SQL output.
    pub create_table: Option<bool>,
}

/// A custom field type defined in configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypeConfig {
    /// Fixed list of values to pick from.
    pub values: Option<Vec<String>>,
    /// Weights for each value (must be same length as `values`).
    pub weights: Option<Vec<f64>>,
    /// Template: `#` digit, `?` uppercase letter, `*` alphanumeric.
    pub pattern: Option<String>,
}

/// Read and parse a rowsmith.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed.
pub fn read_config(dir: &Path) -> Result<Option<RowsmithConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| RowsmithError::Configuration {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let config: RowsmithConfig =
        toml::from_str(&content).map_err(|e| RowsmithError::Configuration {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;

    // Validate semantic constraints that serde can't enforce.
    config.validate()?;
    tracing::debug!(path = %path.display(), types = config.types.len(), "Loaded config");

    Ok(Some(config))
}

impl RowsmithConfig {
    /// Validate semantic constraints that serde cannot enforce.
    ///
    /// Catches mismatched `values`/`weights`, types that define both or
    /// neither of `values` and `pattern`, and unknown dialect, language, or
    /// format names before any rows are generated.
    pub fn validate(&self) -> Result<()> {
        if let Some(p) = self.generate.null_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(RowsmithError::config(format!(
                    "generate.null_probability must be between 0.0 and 1.0, got {}",
                    p
                )));
            }
        }
        if let Some(ref d) = self.output.dialect {
            d.parse::<Dialect>()?;
        }
        if let Some(ref l) = self.output.language {
            l.parse::<Language>()?;
        }
        if let Some(ref f) = self.output.format {
            f.parse::<ExportFormat>()?;
        }

        for (name, type_cfg) in &self.types {
            if !matches!(FieldType::parse(name), FieldType::Custom(_)) {
                return Err(RowsmithError::config(format!(
                    "Type '{}' shadows a built-in field type. Pick another name.",
                    name
                )));
            }
            match (&type_cfg.values, &type_cfg.pattern) {
                (Some(_), Some(_)) => {
                    return Err(RowsmithError::config(format!(
                        "Type '{}': set either values or pattern, not both.",
                        name
                    )));
                }
                (None, None) => {
                    return Err(RowsmithError::config(format!(
                        "Type '{}': needs a values list or a pattern.",
                        name
                    )));
                }
                (Some(values), None) => {
                    if values.is_empty() {
                        return Err(RowsmithError::config(format!(
                            "Type '{}': values must not be empty.",
                            name
                        )));
                    }
                    if let Some(ref weights) = type_cfg.weights {
                        if weights.len() != values.len() {
                            return Err(RowsmithError::config(format!(
                                "Type '{}': weights has {} entries but values has {} entries. \
                                 They must be the same length.",
                                name,
                                weights.len(),
                                values.len(),
                            )));
                        }
                    }
                }
                (None, Some(_)) => {
                    if type_cfg.weights.is_some() {
                        return Err(RowsmithError::config(format!(
                            "Type '{}': weights provided without values. \
                             Add a matching values list or remove the weights.",
                            name,
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Generation options from the `[generate]` section, defaults elsewhere.
    pub fn generation_options(&self) -> GenerationOptions {
        let defaults = GenerationOptions::default();
        GenerationOptions {
            seed: self.generate.seed,
            null_probability: self
                .generate
                .null_probability
                .unwrap_or(defaults.null_probability),
            max_unique_attempts: self
                .generate
                .max_unique_attempts
                .unwrap_or(defaults.max_unique_attempts),
        }
    }

    /// Build the custom type table from the `[types]` section.
    pub fn custom_types(&self) -> Result<CustomTypes> {
        let mut types = CustomTypes::new();
        for (name, type_cfg) in &self.types {
            match (&type_cfg.values, &type_cfg.pattern) {
                (Some(values), _) => types.register(
                    name.clone(),
                    ValueListGenerator::new(values.clone(), type_cfg.weights.clone())?,
                ),
                (None, Some(pattern)) => {
                    types.register(name.clone(), PatternGenerator::new(pattern.clone()))
                }
                (None, None) => {
                    return Err(RowsmithError::config(format!(
                        "Type '{}': needs a values list or a pattern.",
                        name
                    )));
                }
            }
        }
        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::engine::DatasetGenerator;
    use crate::schema::{FieldSpec, Schema};

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[generate]
rows = 500
seed = 42
null_probability = 0.25
max_unique_attempts = 50

[output]
table = "device"
dialect = "sqlserver"
language = "java"
format = "csv"
transaction = true

[types.department]
values = ["Sales", "Engineering"]
weights = [0.3, 0.7]

[types.badge]
pattern = "EMP-####"
"#;

        let config: RowsmithConfig = toml::from_str(toml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.generate.rows, Some(500));
        assert_eq!(config.output.table.as_deref(), Some("device"));
        assert_eq!(config.output.transaction, Some(true));
        assert_eq!(config.types.len(), 2);

        let options = config.generation_options();
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.null_probability, 0.25);
        assert_eq!(options.max_unique_attempts, 50);

        let types = config.custom_types().unwrap();
        assert_eq!(types.names(), vec!["badge", "department"]);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: RowsmithConfig = toml::from_str("").unwrap();
        assert!(config.generate.rows.is_none());
        assert!(config.types.is_empty());
        assert_eq!(config.generation_options(), GenerationOptions::default());
    }

    #[test]
    fn test_validate_rejects_mismatched_weights() {
        let toml = r#"
[types.color]
values = ["red", "blue"]
weights = [1.0]
"#;
        let config: RowsmithConfig = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("same length"));
    }

    #[test]
    fn test_validate_rejects_unknown_dialect() {
        let toml = "[output]\ndialect = \"db2\"\n";
        let config: RowsmithConfig = toml::from_str(toml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(RowsmithError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_builtin_shadowing() {
        let toml = "[types.email]\nvalues = [\"a@b.c\"]\n";
        let config: RowsmithConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_read_config_nonexistent() {
        let result = read_config(Path::new("/nonexistent/dir"));
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_read_config_from_disk_drives_generation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[generate]\nseed = 7\n\n[types.badge]\npattern = \"EMP-###\"\n",
        )
        .unwrap();

        let config = read_config(dir.path()).unwrap().unwrap();
        let generator = DatasetGenerator::new(config.generation_options())
            .with_custom_types(config.custom_types().unwrap());
        let schema = Schema::new(vec![FieldSpec::new("badge", FieldType::parse("badge"))]);
        let dataset = generator.generate(&schema, 3).unwrap();
        for row in &dataset {
            let badge = row["badge"].as_string().unwrap();
            assert!(badge.starts_with("EMP-"));
            assert_eq!(badge.len(), 7);
        }
    }

    #[test]
    fn test_read_config_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[generate\nrows = ").unwrap();
        assert!(read_config(dir.path()).is_err());
    }
}
