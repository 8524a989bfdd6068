//! Rendering a snapshot as an executable SQL script

use crate::backup::{ColumnInfo, DatabaseSnapshot, FunctionDefinition, TableSchema};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write;

/// Roles granted execute permission on every restored function
const FUNCTION_ROLES: [&str; 3] = ["authenticated", "anon", "service_role"];

/// The introspection function itself is never restored
const SKIPPED_FUNCTION: &str = "get_function_definitions";

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "-- ============================");
    let _ = writeln!(out, "-- {}", title);
    let _ = writeln!(out, "-- ============================");
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Renders one value of a data row as an SQL literal
///
/// Strings are quoted with `''` escaping, null is `NULL`, numbers and
/// booleans are written as-is. Arrays become `ARRAY[...]` constructors (an
/// empty array is the `'{}'` literal, which takes the column's element
/// type) and objects become quoted JSON text.
///
/// # Examples
///
/// ```
/// use pricecharting_scraper::backup::format_sql_value;
/// use serde_json::json;
///
/// assert_eq!(format_sql_value(&json!("it's")), "'it''s'");
/// assert_eq!(format_sql_value(&json!(null)), "NULL");
/// assert_eq!(format_sql_value(&json!(["a", "b"])), "ARRAY['a', 'b']");
/// assert_eq!(format_sql_value(&json!([])), "'{}'");
/// ```
pub fn format_sql_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) if items.is_empty() => "'{}'".to_string(),
        Value::Array(items) => {
            let elements: Vec<String> = items.iter().map(format_sql_value).collect();
            format!("ARRAY[{}]", elements.join(", "))
        }
        Value::Object(_) => quote(&value.to_string()),
    }
}

fn is_json_type(data_type: Option<&str>) -> bool {
    matches!(data_type, Some("json") | Some("jsonb"))
}

/// Renders a value for a column of the given `data_type`
///
/// Arrays and objects stored in `json`/`jsonb` columns are written as quoted
/// JSON text; everything else goes through [`format_sql_value`].
pub fn format_column_value(value: &Value, data_type: Option<&str>) -> String {
    match value {
        Value::Array(_) | Value::Object(_) if is_json_type(data_type) => quote(&value.to_string()),
        _ => format_sql_value(value),
    }
}

fn column_sql(column: &ColumnInfo) -> Option<String> {
    let name = column.column_name.as_deref()?;
    let mut def = format!("{} {}", name, column.data_type.as_deref().unwrap_or_default());

    if let Some(length) = column.character_maximum_length.filter(|l| *l > 0) {
        let _ = write!(def, "({})", length);
    }
    if column.is_nullable.as_deref() == Some("NO") {
        def.push_str(" NOT NULL");
    }
    if let Some(default) = column.column_default.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(def, " DEFAULT {}", default);
    }

    Some(def)
}

/// Builds the `CREATE TABLE` statement for a table
pub fn create_table_sql(table: &TableSchema) -> String {
    let columns: Vec<String> = table.columns.iter().filter_map(column_sql).collect();
    format!(
        "CREATE TABLE {} (\n  {}\n);",
        table.name,
        columns.join(",\n  ")
    )
}

fn function_sql(functions: &[FunctionDefinition]) -> String {
    let mut statements = Vec::new();

    for func in functions {
        if func.function_name == SKIPPED_FUNCTION {
            continue;
        }
        let signature = format!("{}({})", func.function_name, func.arguments);

        statements.push(format!("DROP FUNCTION IF EXISTS {} CASCADE;", signature));
        statements.push(format!(
            "CREATE OR REPLACE FUNCTION {}\nRETURNS {}\nLANGUAGE {}\n{}\n{} AS\n$function$\n{}\n$function$;",
            signature,
            func.return_type,
            func.language,
            func.security_type,
            func.volatility,
            func.source_code
        ));
        for role in FUNCTION_ROLES {
            statements.push(format!(
                "GRANT EXECUTE ON FUNCTION {} TO {};",
                signature, role
            ));
        }
    }

    statements.join("\n\n")
}

/// Renders the complete dump script
///
/// Sections, inside one `BEGIN; ... COMMIT;` block: functions, table drops
/// in reverse order, table creates, indexes (primary key indexes are created
/// with their tables), triggers, table data, views.
pub fn render_dump(snapshot: &DatabaseSnapshot, created_at: NaiveDateTime) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "-- Backup created at {}\n",
        created_at.format("%Y-%m-%d %H:%M:%S")
    );
    out.push_str("BEGIN;\n\n");

    section(&mut out, "FUNCTIONS");
    let functions = function_sql(&snapshot.functions);
    if !functions.is_empty() {
        let _ = write!(out, "{}\n\n", functions);
    }

    section(&mut out, "DROP TABLES");
    for table in snapshot.tables.iter().rev() {
        let _ = writeln!(out, "DROP TABLE IF EXISTS {} CASCADE;", table.name);
    }
    out.push('\n');

    section(&mut out, "CREATE TABLES");
    for table in &snapshot.tables {
        let _ = write!(out, "{}\n\n", create_table_sql(table));
    }

    section(&mut out, "INDEXES");
    let indexes: Vec<String> = snapshot
        .indexes
        .iter()
        .filter(|idx| !idx.indexname.ends_with("_pkey"))
        .map(|idx| format!("{};", idx.indexdef))
        .collect();
    if !indexes.is_empty() {
        let _ = write!(out, "{}\n\n", indexes.join("\n"));
    }

    section(&mut out, "TRIGGERS");
    let triggers: Vec<String> = snapshot
        .triggers
        .iter()
        .flat_map(|trig| {
            [
                format!(
                    "DROP TRIGGER IF EXISTS {} ON {} CASCADE;",
                    trig.trigger_name, trig.table_name
                ),
                format!("{};", trig.trigger_definition),
            ]
        })
        .collect();
    if !triggers.is_empty() {
        let _ = write!(out, "{}\n\n", triggers.join("\n"));
    }

    section(&mut out, "TABLE DATA");
    for table in snapshot.data.iter().filter(|t| !t.rows.is_empty()) {
        let _ = writeln!(out, "\n-- Data for {}", table.table);
        let types: HashMap<&str, &str> = snapshot
            .tables
            .iter()
            .filter(|schema| schema.name == table.table)
            .flat_map(|schema| &schema.columns)
            .filter_map(|c| Some((c.column_name.as_deref()?, c.data_type.as_deref()?)))
            .collect();

        for row in &table.rows {
            let columns: Vec<&str> = row.keys().map(String::as_str).collect();
            let values: Vec<String> = row
                .iter()
                .map(|(column, value)| {
                    format_column_value(value, types.get(column.as_str()).copied())
                })
                .collect();
            let _ = writeln!(
                out,
                "INSERT INTO {} ({}) VALUES ({});",
                table.table,
                columns.join(", "),
                values.join(", ")
            );
        }
    }

    out.push('\n');
    section(&mut out, "VIEWS");
    let views: Vec<String> = snapshot
        .views
        .iter()
        .flat_map(|view| {
            [
                format!("DROP VIEW IF EXISTS {} CASCADE;", view.viewname),
                format!("CREATE VIEW {} AS\n{};", view.viewname, view.definition),
            ]
        })
        .collect();
    if !views.is_empty() {
        let _ = write!(out, "{}\n\n", views.join("\n\n"));
    }

    out.push_str("\nCOMMIT;\n");
    out
}
