//! Per-table facades
//!
//! Associates each query with an owning table through ordered lexical rules
//! over the raw SQL text and derives simplified method names. This is a
//! best-effort heuristic, not a SQL parser: a query with no recognizable
//! target is simply excluded from facade generation.

use serde::Serialize;
use tracing::debug;

use crate::codegen::queries::QueryMethod;
use crate::codegen::strings::to_snake_case;
use crate::request::Query;

/// A facade method wrapping one query method under a simplified name
#[derive(Debug, Clone, Serialize)]
pub struct FacadeMethod {
    /// Underlying `Queries` method name
    pub name: String,
    /// Simplified name exposed on the repository
    pub method_name: String,
    pub param_list: String,
    /// Arguments in the target's signature order; delegation stays in sync
    /// by name, not position
    pub signature_args: String,
    pub return_type: String,
}

/// All facade methods for one table
#[derive(Debug, Clone)]
pub struct TableFacade {
    pub table: String,
    pub methods: Vec<FacadeMethod>,
}

/// Group query methods by owning table, in first-appearance order
pub fn group_by_table(queries: &[Query], methods: &[QueryMethod]) -> Vec<TableFacade> {
    let mut facades: Vec<TableFacade> = Vec::new();

    for (query, method) in queries.iter().zip(methods) {
        let Some(table) = extract_table_name(&query.text) else {
            debug!(query = ?query.name, "No owning table found, excluded from facades");
            continue;
        };

        let facade_method = FacadeMethod {
            name: method.name.clone(),
            method_name: simplify_method_name(&method.name, &table),
            param_list: method.param_list.clone(),
            signature_args: method.signature_args.clone(),
            return_type: method.return_type.clone(),
        };

        match facades.iter_mut().find(|f| f.table == table) {
            Some(facade) => facade.methods.push(facade_method),
            None => facades.push(TableFacade {
                table,
                methods: vec![facade_method],
            }),
        }
    }

    facades
}

/// Best-effort extraction of the owning table from raw SQL
///
/// Checks an insertion target, an update target, a deletion source, and the
/// primary selection source, in that priority order; first match wins.
pub fn extract_table_name(sql: &str) -> Option<String> {
    let sql = sql.to_lowercase();

    if let Some(rest) = find_after(&sql, "insert into") {
        return target_token(rest);
    }

    if let Some(rest) = sql.trim_start().strip_prefix("update ") {
        return target_token(rest);
    }

    if let Some(rest) = find_after(&sql, "delete from") {
        return target_token(rest);
    }

    if let Some(rest) = find_after(&sql, "from") {
        return target_token(rest);
    }

    None
}

fn find_after<'a>(haystack: &'a str, needle: &str) -> Option<&'a str> {
    haystack
        .find(needle)
        .map(|idx| &haystack[idx + needle.len()..])
}

/// First identifier-ish token: whitespace-delimited, cut at an opening
/// parenthesis ("authors(name, bio)" -> "authors"), trailing punctuation
/// dropped
fn target_token(rest: &str) -> Option<String> {
    let token = rest.split_whitespace().next()?;
    let token = token.split('(').next()?;
    let token = token.trim_end_matches([',', ';']);
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Strip the redundant table name out of a query method name
///
/// Ordered rewrite rules; the generic prefix strip is the fallback and an
/// unmatched name passes through unchanged.
pub fn simplify_method_name(method: &str, table: &str) -> String {
    let table_snake = to_snake_case(table);
    let singular = table_snake
        .strip_suffix('s')
        .unwrap_or(&table_snake)
        .to_string();

    if let Some(rest) = method.strip_prefix(&format!("get_{}", singular)) {
        return format!("find{}", rest);
    }
    if let Some(rest) = method.strip_prefix(&format!("list_{}_by_", table_snake)) {
        return format!("by_{}", rest);
    }
    if method == format!("list_{}", table_snake) {
        return "all".to_string();
    }
    if method.starts_with(&format!("create_{}", singular)) {
        return "create".to_string();
    }
    if method.starts_with(&format!("update_{}", singular)) {
        return "update".to_string();
    }
    if method.starts_with(&format!("delete_{}", singular)) {
        return "delete".to_string();
    }

    if let Some(rest) = method.strip_prefix(&format!("{}_", table_snake)) {
        return rest.to_string();
    }
    if let Some(rest) = method.strip_prefix(&format!("{}_", singular)) {
        return rest.to_string();
    }

    method.to_string()
}
