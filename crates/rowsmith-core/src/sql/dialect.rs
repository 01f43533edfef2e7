use crate::error::Result;
use crate::generate::engine::Row;
use crate::generate::value::Value;
use crate::output::json::{json_key, json_value};
use crate::sql::{build_insert, Dialect, InsertWriter, PLAIN_IDENTIFIER};

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlInserts;

impl InsertWriter for MySqlInserts {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn insert_statement(&self, table: &str, row: &Row) -> Result<String> {
        Ok(format!("{};", build_insert(table, row, Dialect::MySql)))
    }
}

/// Appends `RETURNING id` so the generated key comes back to the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresInserts;

impl InsertWriter for PostgresInserts {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSql
    }

    fn insert_statement(&self, table: &str, row: &Row) -> Result<String> {
        Ok(format!(
            "{} RETURNING id;",
            build_insert(table, row, Dialect::PostgreSql)
        ))
    }
}

/// Appends `RETURNING id INTO :id` for use from PL/SQL or a bind-aware client.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleInserts;

impl InsertWriter for OracleInserts {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn insert_statement(&self, table: &str, row: &Row) -> Result<String> {
        Ok(format!(
            "{} RETURNING id INTO :id;",
            build_insert(table, row, Dialect::Oracle)
        ))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerInserts;

impl InsertWriter for SqlServerInserts {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn insert_statement(&self, table: &str, row: &Row) -> Result<String> {
        Ok(format!("{};", build_insert(table, row, Dialect::SqlServer)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteInserts;

impl InsertWriter for SqliteInserts {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn insert_statement(&self, table: &str, row: &Row) -> Result<String> {
        Ok(format!("{};", build_insert(table, row, Dialect::Sqlite)))
    }
}

/// MongoDB shell syntax: `db.<collection>.insertOne({...});`.
///
/// Collection names that are not plain identifiers go through
/// `db.getCollection("...")`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentInserts;

impl InsertWriter for DocumentInserts {
    fn dialect(&self) -> Dialect {
        Dialect::Document
    }

    fn insert_statement(&self, collection: &str, row: &Row) -> Result<String> {
        let target = if PLAIN_IDENTIFIER.is_match(collection) {
            format!("db.{}", collection)
        } else {
            format!("db.getCollection({})", json_key(collection)?)
        };

        let mut fields = Vec::with_capacity(row.len());
        for (key, value) in row {
            fields.push(format!("{}: {}", json_key(key)?, document_literal(value)?));
        }
        Ok(format!("{}.insertOne({{{}}});", target, fields.join(", ")))
    }
}

/// Shell literal for a value. Dates and datetimes become `ISODate(...)`.
fn document_literal(value: &Value) -> Result<String> {
    match value {
        Value::Date(d) => Ok(format!("ISODate(\"{}\")", d.format("%Y-%m-%d"))),
        Value::DateTime(ts) => Ok(format!("ISODate(\"{}\")", ts.format("%Y-%m-%dT%H:%M:%S"))),
        other => json_value(other),
    }
}
