//! Record-type registry
//!
//! Builds canonical struct descriptors from table schemas and query result
//! shapes, deduplicating by structural signature. Table structs register
//! first so a query whose result shape matches a table gets the table's name
//! instead of a synthetic one. The registry is built once per run and
//! read-only afterwards.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::codegen::strings::{singularize, to_pascal_case, to_snake_case};
use crate::codegen::types::TypeMapper;
use crate::request::{GenerateRequest, Query};

const SYSTEM_SCHEMAS: [&str; 2] = ["information_schema", "pg_catalog"];
const SYSTEM_TABLE_PREFIXES: [&str; 2] = ["pg_", "sql_"];

/// One field of a generated struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Crystal field name (snake_case)
    pub name: String,
    /// Wire name as it appears in the result set
    pub db_name: String,
    /// Resolved Crystal type, nullability included
    #[serde(rename = "type")]
    pub typ: String,
}

/// A generated struct
#[derive(Debug, Clone, Serialize)]
pub struct StructDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    /// Source table, set only for table-derived structs
    pub table: Option<String>,
}

impl StructDescriptor {
    /// Structural identity: the ordered (name, type) sequence
    pub fn signature(&self) -> String {
        signature_of(&self.fields)
    }
}

fn signature_of(fields: &[FieldDescriptor]) -> String {
    let mut sig = String::new();
    for field in fields {
        sig.push_str(&field.name);
        sig.push(':');
        sig.push_str(&field.typ);
        sig.push(';');
    }
    sig
}

/// Registry of all structs for one generation run
#[derive(Debug, Default)]
pub struct StructRegistry {
    structs: Vec<StructDescriptor>,
    /// signature -> struct name; first registration wins
    by_signature: HashMap<String, String>,
    /// table name -> canonical struct name (survives signature collapses)
    table_structs: HashMap<String, String>,
}

impl StructRegistry {
    /// Build the registry: table structs first, then query-result structs
    pub fn build(req: &GenerateRequest, mapper: &TypeMapper) -> Self {
        let mut registry = StructRegistry::default();

        for schema in &req.catalog.schemas {
            if SYSTEM_SCHEMAS.contains(&schema.name.as_str()) {
                continue;
            }

            for table in &schema.tables {
                if SYSTEM_TABLE_PREFIXES
                    .iter()
                    .any(|prefix| table.name.starts_with(prefix))
                {
                    continue;
                }

                let fields: Vec<FieldDescriptor> = table
                    .columns
                    .iter()
                    .map(|col| FieldDescriptor {
                        name: to_snake_case(&col.name),
                        db_name: col.name.clone(),
                        typ: mapper.resolve(col),
                    })
                    .collect();

                if fields.is_empty() {
                    continue;
                }

                let name = to_pascal_case(&singularize(&table.name));
                let registered =
                    registry.register(name, fields, Some(table.name.clone()));
                registry
                    .table_structs
                    .insert(table.name.clone(), registered);
            }
        }

        for query in &req.queries {
            if !query.cmd.returns_rows() || query.columns.is_empty() {
                continue;
            }

            let fields = registry.query_result_fields(query, mapper);
            let signature = signature_of(&fields);
            if registry.by_signature.contains_key(&signature) {
                trace!(query = ?query.name, "Result shape matches an existing struct");
                continue;
            }

            let name = query_struct_name(query);
            registry.register(name, fields, None);
        }

        debug!(structs = registry.structs.len(), "Struct registry built");
        registry
    }

    /// Register a struct unless its signature is already taken.
    /// Returns the canonical name for the signature either way.
    fn register(
        &mut self,
        name: String,
        fields: Vec<FieldDescriptor>,
        table: Option<String>,
    ) -> String {
        let signature = signature_of(&fields);
        if let Some(existing) = self.by_signature.get(&signature) {
            trace!(name = ?name, existing = ?existing, "Signature collapse");
            return existing.clone();
        }

        self.by_signature.insert(signature, name.clone());
        self.structs.push(StructDescriptor {
            name: name.clone(),
            fields,
            table,
        });
        name
    }

    /// Struct name for a query's result shape, if it needs one.
    /// Single-column queries return their scalar type directly and get none.
    pub fn result_struct_name(&self, query: &Query, mapper: &TypeMapper) -> Option<String> {
        if query.columns.len() <= 1 {
            return None;
        }

        let fields = self.query_result_fields(query, mapper);
        let signature = signature_of(&fields);
        match self.by_signature.get(&signature) {
            Some(name) => Some(name.clone()),
            // Unregistered shape; only reachable for queries skipped during
            // the build phase
            None => Some(query_struct_name(query)),
        }
    }

    /// The canonical struct name for a table, if the table was registered
    pub fn table_struct_name(&self, table: &str) -> Option<&str> {
        self.table_structs.get(table).map(String::as_str)
    }

    /// All registered structs, sorted by name for stable output
    pub fn structs_sorted(&self) -> Vec<&StructDescriptor> {
        let mut list: Vec<&StructDescriptor> = self.structs.iter().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    /// Field list for a query's result shape
    ///
    /// Embed-marked columns group by referenced table in first-appearance
    /// order, one nested field per table; every other column becomes a scalar
    /// field after the embeds, in original order. The same construction
    /// serves registration and lookup so the two can never disagree.
    fn query_result_fields(&self, query: &Query, mapper: &TypeMapper) -> Vec<FieldDescriptor> {
        let has_embeds = query.columns.iter().any(|col| col.embed_table.is_some());
        if !has_embeds {
            return query
                .columns
                .iter()
                .map(|col| FieldDescriptor {
                    name: to_snake_case(&col.name),
                    db_name: col.name.clone(),
                    typ: mapper.resolve(col),
                })
                .collect();
        }

        // First-appearance order of each embedded table, not map order
        let mut embedded_tables: Vec<&str> = Vec::new();
        for col in &query.columns {
            if let Some(table) = col.embed_table.as_deref() {
                if !embedded_tables.contains(&table) {
                    embedded_tables.push(table);
                }
            }
        }

        let mut fields = Vec::with_capacity(query.columns.len());
        for table in embedded_tables {
            let struct_name = match self.table_struct_name(table) {
                Some(name) => name.to_string(),
                None => to_pascal_case(&singularize(table)),
            };

            let mut typ = struct_name;
            if embed_is_optional(&query.text, table) {
                typ.push('?');
            }

            let field_name = to_snake_case(&singularize(table));
            fields.push(FieldDescriptor {
                db_name: field_name.clone(),
                name: field_name,
                typ,
            });
        }

        for col in &query.columns {
            if col.embed_table.is_some() {
                continue;
            }
            fields.push(FieldDescriptor {
                name: to_snake_case(&col.name),
                db_name: col.name.clone(),
                typ: mapper.resolve(col),
            });
        }

        fields
    }
}

/// Synthetic struct name for a query's result row
fn query_struct_name(query: &Query) -> String {
    let mut name = to_pascal_case(&query.name);
    if query.cmd.returns_rows() {
        name.push_str("Row");
    }
    name
}

/// Whether an embedded table's field should be optional
///
/// Heuristic over the compiled SQL text: under an outer join, any table that
/// is not the primary FROM table sits on the potentially-absent side. May
/// misclassify multi-way joins; structural join info upstream would be
/// needed to do better.
fn embed_is_optional(sql: &str, table: &str) -> bool {
    let upper = sql.to_uppercase();
    let has_outer_join = upper.contains("LEFT JOIN") || upper.contains("RIGHT JOIN");
    has_outer_join && !upper.contains(&format!("FROM {}", table.to_uppercase()))
}
