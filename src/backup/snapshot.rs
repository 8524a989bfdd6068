//! Collection of everything a dump needs, before anything is written

use crate::backup::{
    BackupError, BackupResult, ColumnInfo, FunctionDefinition, IndexDefinition, Row,
    SchemaSource, TriggerDefinition, ViewDefinition,
};

/// Columns of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

/// Rows of one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub table: String,
    pub rows: Vec<Row>,
}

/// Full description of the database, in dump order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseSnapshot {
    /// Public base tables in listing order
    pub tables: Vec<TableSchema>,
    pub functions: Vec<FunctionDefinition>,
    pub indexes: Vec<IndexDefinition>,
    pub triggers: Vec<TriggerDefinition>,
    pub views: Vec<ViewDefinition>,
    /// Rows per table, same order as `tables`
    pub data: Vec<TableData>,
}

/// Checks a `get_table_schema` result
///
/// An empty result, or a first row without a column name, means the lookup
/// failed; the reason is in `debug_info`.
fn check_table_schema(table: &str, columns: &[ColumnInfo]) -> BackupResult<()> {
    let Some(first) = columns.first() else {
        return Err(BackupError::TableSchema {
            table: table.to_string(),
            reason: "no schema information found".to_string(),
        });
    };

    if let Some(info) = &first.debug_info {
        tracing::debug!("Debug info for {}: {}", table, info);
    }

    if first.column_name.is_none() {
        return Err(BackupError::TableSchema {
            table: table.to_string(),
            reason: first
                .debug_info
                .clone()
                .unwrap_or_else(|| "no column information".to_string()),
        });
    }

    Ok(())
}

/// Queries a schema source for a complete snapshot
///
/// Calls are made one at a time: table list, each table's columns,
/// functions, indexes, triggers, each table's rows, views.
pub async fn collect_snapshot(source: &dyn SchemaSource) -> BackupResult<DatabaseSnapshot> {
    let available = source.list_all_tables().await?;
    for table in &available {
        tracing::debug!(
            "Schema: {}, Table: {}, Type: {}",
            table.schema_name,
            table.table_name,
            table.table_type
        );
    }

    let names: Vec<String> = available
        .into_iter()
        .filter(|t| t.is_public_base_table())
        .map(|t| t.table_name)
        .collect();
    tracing::info!("Tables to backup: {}", names.join(", "));

    let mut tables = Vec::with_capacity(names.len());
    for name in &names {
        let columns = source.get_table_schema(name).await?;
        check_table_schema(name, &columns)?;
        tables.push(TableSchema {
            name: name.clone(),
            columns: columns
                .into_iter()
                .filter(|c| c.column_name.is_some())
                .collect(),
        });
    }

    let functions = source.get_function_definitions().await?;
    tracing::info!("Found {} functions", functions.len());

    let indexes = source.get_index_definitions().await?;
    tracing::info!("Found {} indexes", indexes.len());

    let triggers = source.get_trigger_definitions().await?;
    tracing::info!("Found {} triggers", triggers.len());

    let mut data = Vec::with_capacity(names.len());
    for name in &names {
        let rows = source.select_all(name).await?;
        tracing::debug!("Fetched {} rows from {}", rows.len(), name);
        data.push(TableData {
            table: name.clone(),
            rows,
        });
    }

    let views = source.get_view_definitions().await?;
    tracing::info!("Found {} views", views.len());

    Ok(DatabaseSnapshot {
        tables,
        functions,
        indexes,
        triggers,
        views,
        data,
    })
}
