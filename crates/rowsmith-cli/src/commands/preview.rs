use anyhow::Result;
use comfy_table::Table as ComfyTable;

use rowsmith_core::Dataset;

use crate::args::PreviewArgs;
use crate::commands::{build_generator, load_config, load_schema};

/// Fixed seed for preview so repeated runs show the same rows.
const PREVIEW_SEED: u64 = 42;
const MAX_CELL_WIDTH: usize = 40;

pub fn run(args: &PreviewArgs) -> Result<()> {
    let config = load_config()?;
    let schema = load_schema(&args.schema)?;
    let generator = build_generator(&config, Some(args.seed.unwrap_or(PREVIEW_SEED)))?;
    let dataset = generator.generate(&schema, args.rows)?;

    let title = schema.table.as_deref().unwrap_or("preview");
    println!("━━━ {} ({} rows) ━━━", title, dataset.len());
    if !dataset.is_empty() {
        println!("{}\n", render_table(&dataset));
    }
    Ok(())
}

fn render_table(dataset: &Dataset) -> ComfyTable {
    let columns = dataset.columns();
    let mut t = ComfyTable::new();
    t.set_header(columns.clone());

    for row in dataset {
        let values: Vec<String> = columns
            .iter()
            .map(|col| {
                row.get(*col)
                    .map(|v| truncate(&v.to_string()))
                    .unwrap_or_else(|| "NULL".to_string())
            })
            .collect();
        t.add_row(values);
    }
    t
}

fn truncate(s: &str) -> String {
    if s.chars().count() > MAX_CELL_WIDTH {
        let head: String = s.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsmith_testutil::sample_dataset;

    #[test]
    fn test_truncate_is_char_safe() {
        let long = "é".repeat(50);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_WIDTH);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_table_shows_nulls() {
        let rendered = render_table(&sample_dataset()).to_string();
        assert!(rendered.contains("O'Brien, Pat"));
        assert!(rendered.contains("NULL"));
    }
}
