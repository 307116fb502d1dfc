//! Generate request data structures
//!
//! These types represent the pre-analyzed schema and query descriptors and
//! form the contract between the transport (produces) and code generation
//! (consumes). Everything here is read once, in full, at the start of a run
//! and never mutated afterwards.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A complete generate request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub queries: Vec<Query>,
    /// Raw configuration payload, parsed separately (see [`crate::config::Options`])
    #[serde(default)]
    pub options: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Dialect selector, e.g. "postgresql", "mysql", "sqlite"
    #[serde(default)]
    pub engine: String,
}

/// The schema catalog: ordered schemas, tables, columns
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub schemas: Vec<SchemaDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDef {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// A column, either from a table definition or from a query result shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Column {
    pub name: String,
    /// Raw SQL type name, e.g. "int4" or "VARCHAR(255)"
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub is_array: bool,
    /// Owning table, when the analyzer could resolve one
    #[serde(default)]
    pub table: Option<String>,
    /// Set when this result column stands for an entire embedded row of the
    /// referenced table rather than a single scalar
    #[serde(default)]
    pub embed_table: Option<String>,
}

/// An annotated query
#[derive(Debug, Clone, Deserialize)]
pub struct Query {
    pub name: String,
    #[serde(default)]
    pub text: String,
    pub cmd: CommandKind,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub comments: Vec<String>,
}

/// A bind parameter
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    /// 1-based bind position in source SQL order
    pub number: i32,
    #[serde(default)]
    pub column: Option<Column>,
    /// Bound through an IN-list expansion marker instead of a scalar placeholder
    #[serde(default)]
    pub is_slice: bool,
}

/// Command kind, determining the shape of the generated return value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum CommandKind {
    /// Returns zero or one row
    #[serde(rename = ":one")]
    One,
    /// Returns any number of rows
    #[serde(rename = ":many")]
    Many,
    /// Returns nothing
    #[serde(rename = ":exec")]
    Exec,
    /// Returns execution metadata
    #[serde(rename = ":execresult")]
    ExecResult,
    /// Returns the affected row count
    #[serde(rename = ":execrows")]
    ExecRows,
    /// Returns the last generated identifier
    #[serde(rename = ":execlastid")]
    ExecLastId,
    /// Bulk load; recognized but emitted as a stub
    #[serde(rename = ":copyfrom")]
    CopyFrom,
}

impl CommandKind {
    /// Whether this command yields result rows that may need a row struct
    pub fn returns_rows(&self) -> bool {
        matches!(self, CommandKind::One | CommandKind::Many)
    }
}

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Mysql,
    Sqlite,
}

impl Dialect {
    /// Resolve a dialect from an engine selector string
    pub fn from_engine(engine: &str) -> Option<Self> {
        match engine {
            "postgresql" | "postgres" => Some(Dialect::Postgres),
            "mysql" => Some(Dialect::Mysql),
            "sqlite" => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    /// Resolve with graceful degradation: unknown selectors fall back to
    /// the PostgreSQL mapping rather than failing the run
    pub fn from_engine_lossy(engine: &str) -> Self {
        Dialect::from_engine(engine).unwrap_or_else(|| {
            warn!(engine = ?engine, "Unsupported engine, falling back to postgresql type mapping");
            Dialect::Postgres
        })
    }

    /// Whether the driver can bind an array value to a single placeholder.
    /// Dialects without native array binding need placeholder expansion for
    /// slice parameters at call time.
    pub fn supports_array_binding(&self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}

/// A single generated file
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

/// The full output of one generation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateResponse {
    pub files: Vec<GeneratedFile>,
}
