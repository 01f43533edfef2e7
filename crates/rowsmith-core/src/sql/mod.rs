//! # SQL and Document Inserts
//!
//! One INSERT statement per row for MySQL, PostgreSQL, Oracle, SQL Server,
//! and SQLite, or one `db.<collection>.insertOne({...});` call per row for a
//! MongoDB-style document store.
//!
//! Literal rules shared by the SQL dialects:
//!
//! | value    | literal                                                  |
//! |----------|----------------------------------------------------------|
//! | null     | `NULL`                                                   |
//! | string   | single-quoted, `'` doubled (MySQL also doubles `\`)       |
//! | boolean  | `TRUE`/`FALSE` on PostgreSQL, `1`/`0` elsewhere          |
//! | number   | unquoted                                                 |
//! | date     | `'YYYY-MM-DD'` (Oracle: `DATE 'YYYY-MM-DD'`)             |
//! | datetime | `'YYYY-MM-DD HH:MM:SS'` (Oracle: `TIMESTAMP '...'`)       |
//!
//! [`script`] wraps the statements in a transaction block and [`ddl`] renders
//! a matching `CREATE TABLE`.

pub mod ddl;
pub mod dialect;
pub mod script;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, RowsmithError};
use crate::generate::engine::{Dataset, Row};
use crate::generate::value::Value;

static PLAIN_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static pattern compiles"));

/// Target database dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    PostgreSql,
    Oracle,
    SqlServer,
    Sqlite,
    /// MongoDB-style `insertOne` calls.
    Document,
}

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Dialect::MySql,
        Dialect::PostgreSql,
        Dialect::Oracle,
        Dialect::SqlServer,
        Dialect::Sqlite,
        Dialect::Document,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::Oracle => "oracle",
            Dialect::SqlServer => "sqlserver",
            Dialect::Sqlite => "sqlite",
            Dialect::Document => "document",
        }
    }

    /// `false` only for the document dialect.
    pub fn is_sql(self) -> bool {
        !matches!(self, Dialect::Document)
    }

    /// File extension for a script in this dialect.
    pub fn extension(self) -> &'static str {
        match self {
            Dialect::Document => "js",
            _ => "sql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = RowsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSql),
            "oracle" => Ok(Dialect::Oracle),
            "sqlserver" | "sql_server" | "mssql" => Ok(Dialect::SqlServer),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "document" | "mongodb" | "mongo" => Ok(Dialect::Document),
            other => Err(RowsmithError::config(format!(
                "Unknown SQL dialect '{}'. Expected one of: mysql, postgresql, oracle, sqlserver, sqlite, document",
                other
            ))),
        }
    }
}

/// Capability to turn one row into one insert statement.
pub trait InsertWriter {
    fn dialect(&self) -> Dialect;

    fn insert_statement(&self, table: &str, row: &Row) -> Result<String>;
}

/// The stateless insert writer for a dialect.
pub fn insert_writer(dialect: Dialect) -> Box<dyn InsertWriter> {
    match dialect {
        Dialect::MySql => Box::new(dialect::MySqlInserts),
        Dialect::PostgreSql => Box::new(dialect::PostgresInserts),
        Dialect::Oracle => Box::new(dialect::OracleInserts),
        Dialect::SqlServer => Box::new(dialect::SqlServerInserts),
        Dialect::Sqlite => Box::new(dialect::SqliteInserts),
        Dialect::Document => Box::new(dialect::DocumentInserts),
    }
}

/// Look up an insert writer by dialect name.
pub fn insert_writer_named(name: &str) -> Result<Box<dyn InsertWriter>> {
    Ok(insert_writer(name.parse()?))
}

/// One statement per row, newline-separated, in dataset order.
pub fn render_inserts(table: &str, dialect: Dialect, dataset: &Dataset) -> Result<String> {
    let writer = insert_writer(dialect);
    let mut out = String::new();
    for row in dataset {
        out.push_str(&writer.insert_statement(table, row)?);
        out.push('\n');
    }
    Ok(out)
}

/// Quote an identifier for a dialect, but only when it is not a plain
/// `[A-Za-z_][A-Za-z0-9_]*` name.
pub fn quote_identifier(name: &str, dialect: Dialect) -> String {
    if PLAIN_IDENTIFIER.is_match(name) {
        return name.to_string();
    }
    match dialect {
        Dialect::MySql => format!("`{}`", name.replace('`', "``")),
        Dialect::SqlServer => format!("[{}]", name.replace(']', "]]")),
        _ => format!("\"{}\"", name.replace('"', "\"\"")),
    }
}

/// Quote a string literal with the dialect's escaping rules.
pub fn quote_string(s: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::MySql => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''")),
        Dialect::SqlServer => format!("N'{}'", s.replace('\'', "''")),
        _ => format!("'{}'", s.replace('\'', "''")),
    }
}

/// Render a value as a SQL literal for a dialect.
pub fn sql_literal(value: &Value, dialect: Dialect) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => match dialect {
            Dialect::PostgreSql => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            _ => (if *b { "1" } else { "0" }).to_string(),
        },
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::Float(_) => "NULL".to_string(),
        Value::Date(_) if dialect == Dialect::Oracle => format!("DATE '{}'", value.to_text()),
        Value::DateTime(_) if dialect == Dialect::Oracle => {
            format!("TIMESTAMP '{}'", value.to_text())
        }
        Value::String(s) => quote_string(s, dialect),
        other => quote_string(&other.to_text(), dialect),
    }
}

/// `INSERT INTO t (c1, c2) VALUES (v1, v2)` without a terminator.
pub(crate) fn build_insert(table: &str, row: &Row, dialect: Dialect) -> String {
    let columns: Vec<String> = row.keys().map(|c| quote_identifier(c, dialect)).collect();
    let values: Vec<String> = row.values().map(|v| sql_literal(v, dialect)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table, dialect),
        columns.join(", "),
        values.join(", ")
    )
}
