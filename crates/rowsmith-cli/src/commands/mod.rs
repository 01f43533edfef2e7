pub mod generate;
pub mod preview;

use std::path::Path;

use anyhow::{Context, Result};

use rowsmith_core::config::{read_config, RowsmithConfig};
use rowsmith_core::schema::Schema;
use rowsmith_core::DatasetGenerator;

/// Load the optional rowsmith.toml from the working directory.
pub fn load_config() -> Result<RowsmithConfig> {
    Ok(read_config(Path::new("."))?.unwrap_or_default())
}

pub fn load_schema(path: &Path) -> Result<Schema> {
    Schema::from_path(path).with_context(|| format!("Failed to load schema {}", path.display()))
}

/// A generator with config options and custom types, with `seed` (from a
/// flag) taking priority over the configured one.
pub fn build_generator(config: &RowsmithConfig, seed: Option<u64>) -> Result<DatasetGenerator> {
    let mut options = config.generation_options();
    if seed.is_some() {
        options.seed = seed;
    }
    Ok(DatasetGenerator::new(options).with_custom_types(config.custom_types()?))
}
