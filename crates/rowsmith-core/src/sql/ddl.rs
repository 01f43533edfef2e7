use crate::error::{Result, RowsmithError};
use crate::schema::{FieldSpec, FieldType, Schema};
use crate::sql::{quote_identifier, Dialect};

/// Column width for text-like fields with no declared length.
const DEFAULT_TEXT_WIDTH: usize = 255;

/// Render a `CREATE TABLE` statement matching a schema.
///
/// `pk` fields form the primary key, `unique` fields get a `UNIQUE`
/// constraint, and every non-nullable field is `NOT NULL`. The document
/// dialect has no DDL and is rejected.
pub fn create_table(table: &str, schema: &Schema, dialect: Dialect) -> Result<String> {
    if !dialect.is_sql() {
        return Err(RowsmithError::config(
            "CREATE TABLE is not available for the document dialect",
        ));
    }
    if schema.fields.is_empty() {
        return Err(RowsmithError::config(format!(
            "cannot create table '{}' without fields",
            table
        )));
    }

    let mut lines: Vec<String> = schema
        .fields
        .iter()
        .map(|field| {
            let mut line = format!(
                "    {} {}",
                quote_identifier(&field.name, dialect),
                column_type(field, dialect)
            );
            if !field.nullable || field.pk {
                line.push_str(" NOT NULL");
            }
            if field.unique && !field.pk {
                line.push_str(" UNIQUE");
            }
            line
        })
        .collect();

    let pk_columns: Vec<String> = schema
        .fields
        .iter()
        .filter(|f| f.pk)
        .map(|f| quote_identifier(&f.name, dialect))
        .collect();
    if !pk_columns.is_empty() {
        lines.push(format!("    PRIMARY KEY ({})", pk_columns.join(", ")));
    }

    Ok(format!(
        "CREATE TABLE {} (\n{}\n);",
        quote_identifier(table, dialect),
        lines.join(",\n")
    ))
}

/// Column type for a field in a dialect.
pub fn column_type(field: &FieldSpec, dialect: Dialect) -> String {
    use Dialect::*;

    let fixed = |pg: &str, mysql: &str, oracle: &str, mssql: &str, sqlite: &str| -> String {
        match dialect {
            PostgreSql => pg,
            MySql => mysql,
            Oracle => oracle,
            SqlServer => mssql,
            Sqlite | Document => sqlite,
        }
        .to_string()
    };

    match field.field_type {
        FieldType::Int => fixed("BIGINT", "BIGINT", "NUMBER(19)", "BIGINT", "INTEGER"),
        FieldType::Float => fixed("DOUBLE PRECISION", "DOUBLE", "BINARY_DOUBLE", "FLOAT", "REAL"),
        FieldType::Boolean => fixed("BOOLEAN", "TINYINT(1)", "NUMBER(1)", "BIT", "INTEGER"),
        FieldType::Date => fixed("DATE", "DATE", "DATE", "DATE", "TEXT"),
        FieldType::DateTime => fixed("TIMESTAMP", "DATETIME", "TIMESTAMP", "DATETIME2", "TEXT"),
        FieldType::Time => fixed("TIME", "TIME", "VARCHAR2(8)", "TIME", "TEXT"),
        FieldType::Uuid => fixed("UUID", "CHAR(36)", "VARCHAR2(36)", "UNIQUEIDENTIFIER", "TEXT"),
        FieldType::String => text_type(field.length.unwrap_or(DEFAULT_TEXT_WIDTH), dialect),
        FieldType::Ip => text_type(15, dialect),
        _ => text_type(DEFAULT_TEXT_WIDTH, dialect),
    }
}

fn text_type(width: usize, dialect: Dialect) -> String {
    match dialect {
        Dialect::Oracle => format!("VARCHAR2({})", width),
        Dialect::SqlServer => format!("NVARCHAR({})", width),
        Dialect::Sqlite | Dialect::Document => "TEXT".to_string(),
        Dialect::PostgreSql | Dialect::MySql => format!("VARCHAR({})", width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        let mut id = FieldSpec::new("id", FieldType::Int);
        id.pk = true;
        let mut email = FieldSpec::new("email", FieldType::Email);
        email.unique = true;
        let mut code = FieldSpec::new("code", FieldType::String);
        code.length = Some(6);
        code.nullable = true;
        Schema::new(vec![id, email, code])
    }

    #[test]
    fn test_create_table_postgres() {
        let ddl = create_table("users", &schema(), Dialect::PostgreSql).unwrap();
        assert_eq!(
            ddl,
            "CREATE TABLE users (\n    id BIGINT NOT NULL,\n    email VARCHAR(255) NOT NULL UNIQUE,\n    code VARCHAR(6),\n    PRIMARY KEY (id)\n);"
        );
    }

    #[test]
    fn test_create_table_type_mapping_varies() {
        let ddl = create_table("users", &schema(), Dialect::Oracle).unwrap();
        assert!(ddl.contains("id NUMBER(19) NOT NULL"));
        assert!(ddl.contains("code VARCHAR2(6)"));

        let ddl = create_table("users", &schema(), Dialect::Sqlite).unwrap();
        assert!(ddl.contains("id INTEGER NOT NULL"));
    }

    #[test]
    fn test_document_dialect_has_no_ddl() {
        assert!(matches!(
            create_table("users", &schema(), Dialect::Document),
            Err(RowsmithError::Configuration { .. })
        ));
    }
}
