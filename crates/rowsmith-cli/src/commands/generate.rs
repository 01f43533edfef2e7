use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use rowsmith_core::code::{render_code, Language};
use rowsmith_core::config::RowsmithConfig;
use rowsmith_core::output::{exporter_for, ExportFormat, DEFAULT_DOCUMENT_NAME};
use rowsmith_core::schema::Schema;
use rowsmith_core::sql::script::{render_script, ScriptOptions};
use rowsmith_core::sql::Dialect;

use crate::args::{GenerateArgs, OutputFormat};
use crate::commands::{build_generator, load_config, load_schema};

const DEFAULT_ROWS: usize = 100;

/// What the command writes, after merging flags, rowsmith.toml, and the
/// output file extension.
#[derive(Debug, Clone, PartialEq)]
enum Artifact {
    File(ExportFormat),
    Sql {
        dialect: Dialect,
        transaction: bool,
        create_table: bool,
    },
    Code(Language),
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    let config = load_config()?;
    let schema = load_schema(&args.schema)?;

    let rows = args.rows.or(config.generate.rows).unwrap_or(DEFAULT_ROWS);
    let artifact = resolve_artifact(args, &config)?;
    let table = resolve_table(args, &config, &schema);
    let generator = build_generator(&config, args.seed)?;

    let pb = ProgressBar::new(rows as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} Generating rows... {bar:40.cyan/dim} {pos}/{len} ({eta})")?
            .progress_chars("█▓░"),
    );
    let dataset = generator.generate_with_progress(
        &schema,
        rows,
        Some(&|current, _total| pb.set_position(current as u64)),
    )?;
    pb.finish_and_clear();

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_artifact(&mut writer, &artifact, &table, &schema, &dataset)?;
            writer.flush()?;

            info!(path = %path.display(), rows = dataset.len(), "Wrote artifact");
            eprintln!("✓ Generated {} rows → {}", dataset.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_artifact(&mut writer, &artifact, &table, &schema, &dataset)?;
            writer.flush()?;
            info!(rows = dataset.len(), "Wrote artifact to stdout");
        }
    }

    Ok(())
}

fn write_artifact(
    writer: &mut dyn Write,
    artifact: &Artifact,
    table: &str,
    schema: &Schema,
    dataset: &rowsmith_core::Dataset,
) -> Result<()> {
    match artifact {
        Artifact::File(format) => exporter_for(*format, Some(table)).export(writer, dataset)?,
        Artifact::Sql {
            dialect,
            transaction,
            create_table,
        } => {
            let options = ScriptOptions {
                generated_at: chrono::Local::now().naive_local(),
                transaction: *transaction,
            };
            let ddl = if *create_table { Some(schema) } else { None };
            let script = render_script(table, *dialect, dataset, ddl, &options)?;
            writer.write_all(script.as_bytes())?;
        }
        Artifact::Code(language) => {
            let code = render_code(dataset, *language)?;
            writer.write_all(code.as_bytes())?;
        }
    }
    Ok(())
}

/// Format precedence: `--format`, the output file extension, a `--dialect`
/// or `--language` flag (SQL or code), `[output].format` in rowsmith.toml,
/// then CSV.
fn resolve_artifact(args: &GenerateArgs, config: &RowsmithConfig) -> Result<Artifact> {
    let format = if let Some(f) = args.output_format() {
        f
    } else if args.dialect.is_some() {
        OutputFormat::Sql
    } else if args.language.is_some() {
        OutputFormat::Code
    } else {
        match config.output.format.as_deref() {
            Some(name) => match name.parse::<ExportFormat>()? {
                ExportFormat::Csv => OutputFormat::Csv,
                ExportFormat::Json => OutputFormat::Json,
                ExportFormat::Xml => OutputFormat::Xml,
                ExportFormat::Spreadsheet => OutputFormat::Spreadsheet,
            },
            None => OutputFormat::Csv,
        }
    };

    Ok(match format {
        OutputFormat::Csv => Artifact::File(ExportFormat::Csv),
        OutputFormat::Json => Artifact::File(ExportFormat::Json),
        OutputFormat::Xml => Artifact::File(ExportFormat::Xml),
        OutputFormat::Spreadsheet => Artifact::File(ExportFormat::Spreadsheet),
        OutputFormat::Sql => {
            let name = args
                .dialect
                .as_deref()
                .or(config.output.dialect.as_deref())
                .unwrap_or("postgresql");
            Artifact::Sql {
                dialect: name.parse()?,
                transaction: args.transaction || config.output.transaction.unwrap_or(false),
                create_table: args.create_table || config.output.create_table.unwrap_or(false),
            }
        }
        OutputFormat::Code => {
            let name = args
                .language
                .as_deref()
                .or(config.output.language.as_deref())
                .or(args.language_from_extension())
                .unwrap_or("python");
            Artifact::Code(name.parse()?)
        }
    })
}

/// `--table`, then rowsmith.toml, then the schema's own table, then the
/// schema file stem.
fn resolve_table(args: &GenerateArgs, config: &RowsmithConfig, schema: &Schema) -> String {
    args.table
        .clone()
        .or_else(|| config.output.table.clone())
        .or_else(|| schema.table.clone())
        .or_else(|| {
            args.schema
                .file_stem()
                .and_then(|s| s.to_str())
                .map(String::from)
        })
        .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string())
}
