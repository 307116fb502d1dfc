//! Per-query method models
//!
//! Resolves each query into a render-ready description: parameter names,
//! types and orderings, return-type shape, and slice-parameter expansion for
//! dialects without native array binding. The renderer consumes these models
//! verbatim and re-derives nothing.

use serde::Serialize;
use tracing::warn;

use crate::codegen::registry::StructRegistry;
use crate::codegen::strings::{crystal_string, to_constant_case, to_snake_case};
use crate::codegen::types::TypeMapper;
use crate::request::{CommandKind, Dialect, Query};

/// A resolved query method
#[derive(Debug, Clone, Serialize)]
pub struct QueryMethod {
    /// Method name (snake_case)
    pub name: String,
    /// Original query name
    pub source_name: String,
    /// Name of the SQL constant (CONSTANT_CASE)
    pub constant_name: String,
    /// Raw SQL, quoted as a Crystal string literal
    pub sql_literal: String,
    pub cmd: CommandKind,
    pub comments: Vec<String>,
    /// Parameters in call-signature order: required first, then defaulted,
    /// each group in bind-position order
    pub params: Vec<MethodParam>,
    /// Declaration list, e.g. `id : Int32, bio : String? = nil`
    pub param_list: String,
    /// Argument names in signature order
    pub signature_args: String,
    /// Argument names in original bind-position order
    pub bind_args: String,
    /// Parameters in bind-position order, for flattened binding
    pub bind_params: Vec<BindParam>,
    pub return_type: String,
    /// Row struct for multi-column results
    pub result_struct: Option<String>,
    /// Scalar type for single-column results
    pub single_column_type: Option<String>,
    /// Slice parameters needing placeholder expansion
    pub slice_params: Vec<SliceParam>,
    /// True when this dialect must rewrite the SQL at call time
    pub expand_slices: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodParam {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    /// 1-based bind position in source SQL order
    pub position: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BindParam {
    pub name: String,
    /// Collection values flatten into the bound value list one by one
    pub is_collection: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliceParam {
    pub name: String,
    /// The marker token to replace, quoted as a Crystal literal
    pub marker_literal: String,
}

impl QueryMethod {
    pub fn build(
        query: &Query,
        mapper: &TypeMapper,
        registry: &StructRegistry,
        dialect: Dialect,
    ) -> Self {
        let mut params = Vec::with_capacity(query.params.len());
        let mut slice_params = Vec::new();

        for param in &query.params {
            let name = match &param.column {
                Some(col) if !col.name.is_empty() => to_snake_case(&col.name),
                _ => format!("arg{}", param.number),
            };

            let typ = match &param.column {
                Some(col) if param.is_slice => format!("Array({})", mapper.base_type(col)),
                Some(col) => mapper.resolve(col),
                None => {
                    warn!(
                        query = ?query.name,
                        position = param.number,
                        "Parameter has no column info, falling back to String"
                    );
                    "String".to_string()
                }
            };

            if param.is_slice {
                slice_params.push(SliceParam {
                    name: name.clone(),
                    marker_literal: crystal_string(&format!("/*SLICE:{}*/?", name)),
                });
            }

            params.push(MethodParam {
                name,
                typ,
                position: param.number,
            });
        }

        // Bind order is source SQL order, always
        let mut bind_order = params.clone();
        bind_order.sort_by_key(|p| p.position);
        let bind_args = join_names(&bind_order);
        let bind_params = bind_order
            .iter()
            .map(|p| BindParam {
                name: p.name.clone(),
                is_collection: p.typ.starts_with("Array("),
            })
            .collect();

        // Call signature groups required before defaulted; stable within
        // each group by position
        params.sort_by_key(|p| (is_optional_type(&p.typ), p.position));
        let param_list = params
            .iter()
            .map(|p| {
                if is_optional_type(&p.typ) {
                    format!("{} : {} = nil", p.name, p.typ)
                } else {
                    format!("{} : {}", p.name, p.typ)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let signature_args = join_names(&params);

        let result_struct = match query.cmd.returns_rows() {
            true => registry.result_struct_name(query, mapper),
            false => None,
        };
        let single_column_type = match (query.cmd.returns_rows(), query.columns.as_slice()) {
            (true, [col]) => Some(mapper.resolve(col)),
            _ => None,
        };

        let return_type = match query.cmd {
            CommandKind::One => {
                let inner = match &result_struct {
                    Some(name) => name.clone(),
                    None => single_column_type.clone().unwrap_or_else(|| "Nil".to_string()),
                };
                format!("{}?", inner)
            }
            CommandKind::Many => {
                let inner = match &result_struct {
                    Some(name) => name.clone(),
                    None => single_column_type.clone().unwrap_or_else(|| "Nil".to_string()),
                };
                format!("Array({})", inner)
            }
            CommandKind::Exec => "Nil".to_string(),
            CommandKind::ExecResult => "DB::ExecResult".to_string(),
            CommandKind::ExecRows | CommandKind::ExecLastId | CommandKind::CopyFrom => {
                "Int64".to_string()
            }
        };

        let expand_slices = !slice_params.is_empty() && !dialect.supports_array_binding();

        QueryMethod {
            name: to_snake_case(&query.name),
            source_name: query.name.clone(),
            constant_name: to_constant_case(&query.name),
            sql_literal: crystal_string(&query.text),
            cmd: query.cmd,
            comments: query.comments.clone(),
            params,
            param_list,
            signature_args,
            bind_args,
            bind_params,
            return_type,
            result_struct,
            single_column_type,
            slice_params,
            expand_slices,
        }
    }
}

fn is_optional_type(typ: &str) -> bool {
    typ.ends_with('?')
}

fn join_names(params: &[MethodParam]) -> String {
    params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
