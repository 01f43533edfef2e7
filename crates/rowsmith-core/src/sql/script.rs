use chrono::NaiveDateTime;

use crate::error::Result;
use crate::generate::engine::Dataset;
use crate::generate::value::DATETIME_FORMAT;
use crate::schema::Schema;
use crate::sql::{ddl, insert_writer, Dialect};

/// Savepoint name used by SQL Server and Oracle scripts.
pub const SAVEPOINT_NAME: &str = "rowsmith_seed";

/// Options for a complete, ready-to-run insert script.
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    /// Timestamp written to the header. Supplied by the caller so output is
    /// reproducible.
    pub generated_at: NaiveDateTime,
    /// Wrap the statements in a transaction block with a rollback hint.
    pub transaction: bool,
}

/// Render a full script: header comment, optional transaction block,
/// optional `CREATE TABLE`, then one insert per row.
///
/// The document dialect never gets a transaction block and rejects
/// `CREATE TABLE`.
pub fn render_script(
    table: &str,
    dialect: Dialect,
    dataset: &Dataset,
    create_table: Option<&Schema>,
    options: &ScriptOptions,
) -> Result<String> {
    let comment = if dialect.is_sql() { "--" } else { "//" };
    let writer = insert_writer(dialect);
    let mut out = String::new();

    out.push_str(&format!("{} Generated by rowsmith\n", comment));
    out.push_str(&format!("{} Target: {} ({})\n", comment, table, dialect));
    out.push_str(&format!(
        "{} Generated at: {}\n",
        comment,
        options.generated_at.format(DATETIME_FORMAT)
    ));
    out.push_str(&format!("{} Rows: {}\n\n", comment, dataset.len()));

    let transaction = options.transaction && dialect.is_sql();
    if transaction {
        out.push_str(&begin_block(dialect));
        out.push('\n');
    }

    if let Some(schema) = create_table {
        out.push_str(&ddl::create_table(table, schema, dialect)?);
        out.push_str("\n\n");
    }

    for row in dataset {
        out.push_str(&writer.insert_statement(table, row)?);
        out.push('\n');
    }

    if transaction {
        out.push_str("\n-- To undo these inserts instead of committing, run:\n");
        out.push_str(&format!("-- {}\n", rollback_statement(dialect)));
        out.push_str("COMMIT;\n");
    }

    Ok(out)
}

fn begin_block(dialect: Dialect) -> String {
    match dialect {
        Dialect::PostgreSql => "BEGIN;\n".to_string(),
        Dialect::MySql => "START TRANSACTION;\n".to_string(),
        Dialect::Sqlite => "BEGIN TRANSACTION;\n".to_string(),
        Dialect::SqlServer => format!("BEGIN TRANSACTION;\nSAVE TRANSACTION {};\n", SAVEPOINT_NAME),
        // Oracle opens a transaction implicitly with the first DML statement.
        Dialect::Oracle => format!("SAVEPOINT {};\n", SAVEPOINT_NAME),
        Dialect::Document => String::new(),
    }
}

fn rollback_statement(dialect: Dialect) -> String {
    match dialect {
        Dialect::SqlServer => format!("ROLLBACK TRANSACTION {};", SAVEPOINT_NAME),
        Dialect::Oracle => format!("ROLLBACK TO SAVEPOINT {};", SAVEPOINT_NAME),
        _ => "ROLLBACK;".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::engine::Row;
    use crate::generate::value::Value;
    use crate::schema::{FieldSpec, FieldType};
    use chrono::NaiveDate;

    fn options(transaction: bool) -> ScriptOptions {
        ScriptOptions {
            generated_at: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
            transaction,
        }
    }

    fn dataset() -> Dataset {
        let mut row = Row::new();
        row.insert("id".to_string(), Value::Int(1));
        Dataset::new(vec![row])
    }

    #[test]
    fn test_sqlserver_script_has_savepoint() {
        let script =
            render_script("device", Dialect::SqlServer, &dataset(), None, &options(true)).unwrap();
        assert!(script.starts_with("-- Generated by rowsmith\n"));
        assert!(script.contains("-- Generated at: 2024-01-02 03:04:05\n"));
        assert!(script.contains("BEGIN TRANSACTION;\nSAVE TRANSACTION rowsmith_seed;\n"));
        assert!(script.contains("INSERT INTO device (id) VALUES (1);\n"));
        assert!(script.contains("-- ROLLBACK TRANSACTION rowsmith_seed;\n"));
        assert!(script.ends_with("COMMIT;\n"));
    }

    #[test]
    fn test_script_without_transaction() {
        let script =
            render_script("device", Dialect::PostgreSql, &dataset(), None, &options(false)).unwrap();
        assert!(!script.contains("BEGIN"));
        assert!(!script.contains("COMMIT"));
    }

    #[test]
    fn test_document_script_skips_transaction() {
        let script =
            render_script("device", Dialect::Document, &dataset(), None, &options(true)).unwrap();
        assert!(script.starts_with("// Generated by rowsmith\n"));
        assert!(!script.contains("COMMIT"));
        assert!(script.contains("db.device.insertOne({\"id\": 1});"));
    }

    #[test]
    fn test_script_with_create_table() {
        let schema = Schema::new(vec![FieldSpec::new("id", FieldType::Int)]);
        let script = render_script(
            "device",
            Dialect::MySql,
            &dataset(),
            Some(&schema),
            &options(true),
        )
        .unwrap();
        let create = script.find("CREATE TABLE device").unwrap();
        let insert = script.find("INSERT INTO").unwrap();
        let begin = script.find("START TRANSACTION;").unwrap();
        assert!(begin < create && create < insert);
    }
}
