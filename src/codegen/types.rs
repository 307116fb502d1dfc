//! SQL type to Crystal type mapping
//!
//! Total by construction: every (dialect, raw type, nullability, array)
//! combination resolves to a non-empty Crystal type. Unrecognized raw names
//! degrade to `String` with a warning.

use tracing::warn;

use crate::request::{Column, Dialect};

/// Maps SQL column types to Crystal types for one dialect
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper {
    dialect: Dialect,
    pointer_nullables: bool,
}

impl TypeMapper {
    pub fn new(dialect: Dialect, pointer_nullables: bool) -> Self {
        Self {
            dialect,
            pointer_nullables,
        }
    }

    /// Resolve the full Crystal type for a column, including array wrapping
    /// and nullability.
    ///
    /// Arrays wrap the non-null element type and are never separately
    /// optional; their emptiness represents absence.
    pub fn resolve(&self, col: &Column) -> String {
        let mut typ = self.base_type(col);

        if col.is_array {
            typ = format!("Array({})", typ);
        }

        if !col.not_null && !col.is_array {
            if self.pointer_nullables {
                typ.push('*');
            } else {
                typ.push('?');
            }
        }

        typ
    }

    /// Resolve only the base Crystal type, ignoring nullability and array-ness
    pub fn base_type(&self, col: &Column) -> String {
        let type_name = col.type_name.to_lowercase();

        let mapped = match self.dialect {
            Dialect::Postgres => postgres_type(&type_name),
            Dialect::Mysql => mysql_type(&type_name),
            Dialect::Sqlite => Some(sqlite_type(&type_name)),
        };

        match mapped {
            Some(typ) => typ.to_string(),
            None => {
                warn!(
                    column = ?col.name,
                    sql_type = ?col.type_name,
                    "Unknown SQL type, falling back to String"
                );
                "String".to_string()
            }
        }
    }
}

/// PostgreSQL type names to Crystal types
fn postgres_type(sql_type: &str) -> Option<&'static str> {
    let typ = match sql_type {
        // Integer types
        "int8" | "bigint" | "bigserial" => "Int64",
        "int4" | "int" | "integer" | "serial" => "Int32",
        "int2" | "smallint" | "smallserial" => "Int16",

        // Floating point types; numeric/decimal deliberately lose precision
        "numeric" | "decimal" | "money" => "Float64",
        "real" | "float4" => "Float32",
        "float8" | "double precision" => "Float64",

        // Boolean type
        "bool" | "boolean" => "Bool",

        // String types
        "text" | "varchar" | "char" | "bpchar" | "citext" | "name" => "String",

        // Time types
        "timestamp" | "timestamptz" | "date" | "time" | "timetz" => "Time",
        "interval" => "Time::Span",

        // UUID type
        "uuid" => "String",

        // JSON types
        "json" | "jsonb" => "JSON::Any",

        // Binary type
        "bytea" => "Bytes",

        // Network types
        "inet" | "cidr" | "macaddr" | "macaddr8" => "String",

        // Geometric types
        "point" | "line" | "lseg" | "box" | "path" | "polygon" | "circle" => "String",

        // Bit string types
        "bit" | "bit varying" | "varbit" => "String",

        // Range types
        "int4range" | "int8range" | "numrange" | "tsrange" | "tstzrange" | "daterange" => "String",

        // Other types
        "xml" => "String",
        "void" => "Nil",

        _ => return None,
    };
    Some(typ)
}

/// MySQL type names to Crystal types
fn mysql_type(sql_type: &str) -> Option<&'static str> {
    let typ = match sql_type {
        // Integer types
        "bigint" => "Int64",
        "int" | "integer" | "mediumint" | "year" => "Int32",
        "smallint" => "Int16",
        "tinyint" => "Int8",

        // Floating point types
        "decimal" | "numeric" => "Float64",
        "float" => "Float32",
        "double" | "double precision" | "real" => "Float64",

        // Boolean type
        "bit" | "bool" | "boolean" => "Bool",

        // String types
        "char" | "varchar" | "text" | "tinytext" | "mediumtext" | "longtext" => "String",

        // Time types
        "datetime" | "timestamp" | "date" => "Time",
        "time" => "Time::Span",

        // JSON type
        "json" => "JSON::Any",

        // Binary types
        "binary" | "varbinary" | "blob" | "tinyblob" | "mediumblob" | "longblob" => "Bytes",

        // Enum and set
        "enum" | "set" => "String",

        _ => return None,
    };
    Some(typ)
}

/// SQLite type names to Crystal types
///
/// SQLite has type affinity rather than a static type system, so the raw
/// name is normalized and bucketed by substring rules instead of an exact
/// table lookup. Always resolves; the fallback bucket is `String`.
fn sqlite_type(sql_type: &str) -> &'static str {
    let sql_type = normalize_sqlite_type(sql_type);

    if is_integer_affinity(&sql_type) {
        "Int64"
    } else if is_real_affinity(&sql_type) {
        "Float64"
    } else if is_text_affinity(&sql_type) {
        "String"
    } else if is_blob_affinity(&sql_type) {
        "Bytes"
    } else if is_numeric_affinity(&sql_type) {
        "Float64"
    } else if sql_type == "boolean" || sql_type == "bool" {
        "Bool"
    } else if is_date_time_name(&sql_type) {
        "Time"
    } else {
        "String"
    }
}

/// Strip a parenthesized precision suffix ("VARCHAR(255)" -> "varchar")
fn normalize_sqlite_type(sql_type: &str) -> String {
    let base = match sql_type.find('(') {
        Some(idx) => &sql_type[..idx],
        None => sql_type,
    };
    base.trim().to_lowercase()
}

fn is_integer_affinity(sql_type: &str) -> bool {
    sql_type.contains("int")
}

fn is_real_affinity(sql_type: &str) -> bool {
    matches!(sql_type, "real" | "double" | "double precision" | "float")
}

fn is_text_affinity(sql_type: &str) -> bool {
    sql_type.contains("char") || sql_type.contains("clob") || sql_type.contains("text")
}

fn is_blob_affinity(sql_type: &str) -> bool {
    sql_type == "blob" || sql_type.is_empty()
}

fn is_numeric_affinity(sql_type: &str) -> bool {
    sql_type == "numeric" || sql_type.contains("decimal")
}

fn is_date_time_name(sql_type: &str) -> bool {
    matches!(sql_type, "date" | "datetime" | "timestamp" | "time")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(type_name: &str, not_null: bool, is_array: bool) -> Column {
        Column {
            name: "c".to_string(),
            type_name: type_name.to_string(),
            not_null,
            is_array,
            table: None,
            embed_table: None,
        }
    }

    #[test]
    fn test_postgres_integers() {
        let mapper = TypeMapper::new(Dialect::Postgres, false);
        assert_eq!(mapper.resolve(&col("int8", true, false)), "Int64");
        assert_eq!(mapper.resolve(&col("bigserial", true, false)), "Int64");
        assert_eq!(mapper.resolve(&col("int4", true, false)), "Int32");
        assert_eq!(mapper.resolve(&col("serial", true, false)), "Int32");
        assert_eq!(mapper.resolve(&col("int2", true, false)), "Int16");
    }

    #[test]
    fn test_postgres_nullable_wraps_optional() {
        let mapper = TypeMapper::new(Dialect::Postgres, false);
        assert_eq!(mapper.resolve(&col("int4", false, false)), "Int32?");
        assert_eq!(mapper.resolve(&col("text", false, false)), "String?");
    }

    #[test]
    fn test_postgres_case_insensitive() {
        let mapper = TypeMapper::new(Dialect::Postgres, false);
        assert_eq!(mapper.resolve(&col("INT8", true, false)), "Int64");
        assert_eq!(mapper.resolve(&col("Text", true, false)), "String");
    }

    #[test]
    fn test_numeric_maps_to_float64_everywhere() {
        for dialect in [Dialect::Postgres, Dialect::Mysql, Dialect::Sqlite] {
            let mapper = TypeMapper::new(dialect, false);
            assert_eq!(mapper.resolve(&col("numeric", true, false)), "Float64");
            assert_eq!(mapper.resolve(&col("decimal", true, false)), "Float64");
        }
    }

    #[test]
    fn test_postgres_misc_types() {
        let mapper = TypeMapper::new(Dialect::Postgres, false);
        assert_eq!(mapper.resolve(&col("bool", true, false)), "Bool");
        assert_eq!(mapper.resolve(&col("timestamptz", true, false)), "Time");
        assert_eq!(mapper.resolve(&col("interval", true, false)), "Time::Span");
        assert_eq!(mapper.resolve(&col("jsonb", true, false)), "JSON::Any");
        assert_eq!(mapper.resolve(&col("bytea", true, false)), "Bytes");
        assert_eq!(mapper.resolve(&col("uuid", true, false)), "String");
        assert_eq!(mapper.resolve(&col("void", true, false)), "Nil");
    }

    #[test]
    fn test_arrays_wrap_and_never_optional() {
        let mapper = TypeMapper::new(Dialect::Postgres, false);
        assert_eq!(mapper.resolve(&col("int4", true, true)), "Array(Int32)");
        // Nullable arrays stay bare; emptiness represents absence
        assert_eq!(mapper.resolve(&col("text", false, true)), "Array(String)");
    }

    #[test]
    fn test_pointer_nullables() {
        let mapper = TypeMapper::new(Dialect::Postgres, true);
        assert_eq!(mapper.resolve(&col("text", false, false)), "String*");
        assert_eq!(mapper.resolve(&col("text", true, false)), "String");
    }

    #[test]
    fn test_mysql_types() {
        let mapper = TypeMapper::new(Dialect::Mysql, false);
        assert_eq!(mapper.resolve(&col("bigint", true, false)), "Int64");
        assert_eq!(mapper.resolve(&col("tinyint", true, false)), "Int8");
        assert_eq!(mapper.resolve(&col("varchar", true, false)), "String");
        assert_eq!(mapper.resolve(&col("datetime", true, false)), "Time");
        assert_eq!(mapper.resolve(&col("time", true, false)), "Time::Span");
        assert_eq!(mapper.resolve(&col("longblob", true, false)), "Bytes");
        assert_eq!(mapper.resolve(&col("enum", true, false)), "String");
    }

    #[test]
    fn test_sqlite_affinity() {
        let mapper = TypeMapper::new(Dialect::Sqlite, false);
        assert_eq!(mapper.resolve(&col("INTEGER", true, false)), "Int64");
        assert_eq!(mapper.resolve(&col("VARCHAR(255)", true, false)), "String");
        assert_eq!(mapper.resolve(&col("double", true, false)), "Float64");
        assert_eq!(mapper.resolve(&col("blob", true, false)), "Bytes");
        assert_eq!(mapper.resolve(&col("", true, false)), "Bytes");
        assert_eq!(mapper.resolve(&col("DECIMAL(10,2)", true, false)), "Float64");
        assert_eq!(mapper.resolve(&col("boolean", true, false)), "Bool");
        assert_eq!(mapper.resolve(&col("datetime", true, false)), "Time");
    }

    #[test]
    fn test_unknown_types_fall_back_to_string() {
        let mapper = TypeMapper::new(Dialect::Postgres, false);
        assert_eq!(mapper.resolve(&col("geography", true, false)), "String");
        let mapper = TypeMapper::new(Dialect::Mysql, false);
        assert_eq!(mapper.resolve(&col("geometry", true, false)), "String");
    }

    #[test]
    fn test_totality() {
        // Every combination resolves to a non-empty type
        let raw_names = ["", "int4", "NONSENSE", "varchar(99)", "Point", "???"];
        for dialect in [Dialect::Postgres, Dialect::Mysql, Dialect::Sqlite] {
            for name in raw_names {
                for not_null in [true, false] {
                    for is_array in [true, false] {
                        let mapper = TypeMapper::new(dialect, false);
                        let typ = mapper.resolve(&col(name, not_null, is_array));
                        assert!(!typ.is_empty(), "{:?} {:?} resolved empty", dialect, name);
                    }
                }
            }
        }
    }
}
