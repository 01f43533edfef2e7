use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "rowsmith",
    about = "Generate fake rows from a field schema as files, SQL inserts, or code",
    version,
    after_help = "Examples:\n  rowsmith generate --schema users.json --rows 1000 -o users.csv\n  rowsmith generate --schema users.toml --format sql --dialect mysql --transaction\n  rowsmith generate --schema users.json --format code --language python\n  rowsmith preview --schema users.json --rows 5"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate rows and write them as a file, SQL script, or source code
    Generate(GenerateArgs),

    /// Print a table of sample rows without writing anything
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Schema file (.json or .toml)
    #[arg(long)]
    pub schema: PathBuf,

    /// Number of rows to generate (default: rowsmith.toml, then 100)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Random seed for deterministic generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file path. Writes to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from file extension if not specified)
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// SQL dialect for --format sql
    #[arg(long)]
    pub dialect: Option<String>,

    /// Target language for --format code
    #[arg(long)]
    pub language: Option<String>,

    /// Table, collection, XML root, or worksheet name
    #[arg(long)]
    pub table: Option<String>,

    /// Wrap SQL output in a transaction block
    #[arg(long)]
    pub transaction: bool,

    /// Prepend a CREATE TABLE statement to SQL output
    #[arg(long)]
    pub create_table: bool,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Schema file (.json or .toml)
    #[arg(long)]
    pub schema: PathBuf,

    /// Number of sample rows to preview
    #[arg(long, default_value = "5")]
    pub rows: usize,

    /// Random seed (default: 42 so previews are stable)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Xml,
    Spreadsheet,
    Sql,
    Code,
}

impl GenerateArgs {
    /// Explicit format flag, else the one implied by the output file
    /// extension.
    pub fn output_format(&self) -> Option<OutputFormat> {
        if let Some(fmt) = self.format {
            return Some(fmt);
        }
        let ext = self
            .output
            .as_ref()?
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            "xml" => Some(OutputFormat::Xml),
            "xls" | "xlsx" => Some(OutputFormat::Spreadsheet),
            "sql" => Some(OutputFormat::Sql),
            "py" | "cpp" | "cc" | "java" | "js" => Some(OutputFormat::Code),
            _ => None,
        }
    }

    /// Language implied by a source-file output extension.
    pub fn language_from_extension(&self) -> Option<&'static str> {
        let ext = self.output.as_ref()?.extension()?.to_str()?;
        match ext {
            "py" => Some("python"),
            "cpp" | "cc" => Some("cpp"),
            "java" => Some("java"),
            "js" => Some("javascript"),
            _ => None,
        }
    }
}
