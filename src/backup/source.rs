//! Introspection interface and the row types it returns

use crate::backup::BackupResult;
use async_trait::async_trait;
use serde::Deserialize;

/// One row of table data, columns in database order
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Entry of `list_all_tables`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableInfo {
    pub schema_name: String,
    pub table_name: String,
    pub table_type: String,
}

impl TableInfo {
    /// Only ordinary tables of the public schema are dumped
    pub fn is_public_base_table(&self) -> bool {
        self.schema_name == "public" && self.table_type == "BASE TABLE"
    }
}

/// Entry of `get_table_schema`
///
/// A failing lookup comes back as a single row with no column name and the
/// reason in `debug_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnInfo {
    pub column_name: Option<String>,
    pub data_type: Option<String>,
    pub character_maximum_length: Option<i64>,
    pub is_nullable: Option<String>,
    pub column_default: Option<String>,
    pub debug_info: Option<String>,
}

/// Entry of `get_function_definitions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FunctionDefinition {
    pub function_name: String,
    pub arguments: String,
    pub return_type: String,
    pub language: String,
    pub security_type: String,
    pub volatility: String,
    pub source_code: String,
}

/// Entry of `get_index_definitions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IndexDefinition {
    pub indexname: String,
    pub tablename: String,
    pub indexdef: String,
}

/// Entry of `get_trigger_definitions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TriggerDefinition {
    pub trigger_name: String,
    pub table_name: String,
    pub trigger_definition: String,
}

/// Entry of `get_view_definitions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewDefinition {
    pub viewname: String,
    pub definition: String,
}

/// A database that can describe itself
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Every table visible to the API, any schema or type
    async fn list_all_tables(&self) -> BackupResult<Vec<TableInfo>>;

    /// Column definitions of one table
    async fn get_table_schema(&self, table: &str) -> BackupResult<Vec<ColumnInfo>>;

    async fn get_function_definitions(&self) -> BackupResult<Vec<FunctionDefinition>>;

    async fn get_index_definitions(&self) -> BackupResult<Vec<IndexDefinition>>;

    async fn get_trigger_definitions(&self) -> BackupResult<Vec<TriggerDefinition>>;

    async fn get_view_definitions(&self) -> BackupResult<Vec<ViewDefinition>>;

    /// Every row of one table
    async fn select_all(&self, table: &str) -> BackupResult<Vec<Row>>;
}
