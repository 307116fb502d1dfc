//! Configuration options
//!
//! The generate request carries a free-form options payload. Parsing it into
//! [`Options`] is the one fatal validation step of a run: a malformed payload
//! aborts generation before any output is produced.

use serde::Deserialize;
use tracing::{debug, error};

use crate::error::CrystalgenError;

/// Recognized generation options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Crystal module wrapping all generated code. Supports nested names
    /// ("Shop::Db"); empty resolves to "Db".
    pub module: String,
    /// Emit `JSON::Serializable` and `@[JSON::Field]` annotations
    pub emit_json_tags: bool,
    /// Emit `YAML::Serializable` and `@[YAML::Field]` annotations
    pub emit_yaml_tags: bool,
    /// Emit `@[DB::Field]` annotations where the wire name differs
    pub emit_db_tags: bool,
    /// Emit `getter?` for boolean fields
    pub emit_boolean_question_getters: bool,
    /// Suffix nullable values with `*` instead of `?`
    pub emit_result_struct_pointers: bool,
    /// Emit the `database.cr` connection manager
    pub generate_connection_manager: bool,
    /// Emit one repository file per table
    pub generate_repositories: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            module: String::new(),
            emit_json_tags: false,
            emit_yaml_tags: false,
            emit_db_tags: false,
            emit_boolean_question_getters: false,
            emit_result_struct_pointers: false,
            generate_connection_manager: false,
            generate_repositories: false,
        }
    }
}

impl Options {
    /// Parse options from the raw request payload
    ///
    /// A `null`/absent payload yields defaults. Anything that does not
    /// deserialize cleanly is a fatal configuration error.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CrystalgenError> {
        let mut options: Options = if value.is_null() {
            debug!("No options payload, using defaults");
            Options::default()
        } else {
            serde_json::from_value(value).map_err(|e| {
                error!(error = %e, "Malformed options payload");
                CrystalgenError::Config(format!("malformed options payload: {}", e))
            })?
        };

        if options.module.is_empty() {
            options.module = "Db".to_string();
        }

        // Field wire names must survive somewhere; default to DB tags when no
        // serialization format was requested
        if !options.emit_json_tags && !options.emit_yaml_tags && !options.emit_db_tags {
            options.emit_db_tags = true;
        }

        debug!(options = ?options, "Options resolved");
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_payload_uses_defaults() {
        let options = Options::from_value(serde_json::Value::Null).unwrap();
        assert_eq!(options.module, "Db");
        assert!(options.emit_db_tags);
        assert!(!options.emit_json_tags);
        assert!(!options.generate_repositories);
    }

    #[test]
    fn test_module_default_applied() {
        let options = Options::from_value(json!({"emit_json_tags": true})).unwrap();
        assert_eq!(options.module, "Db");
    }

    #[test]
    fn test_db_tags_default_suppressed_by_json_tags() {
        let options = Options::from_value(json!({"emit_json_tags": true})).unwrap();
        assert!(options.emit_json_tags);
        assert!(!options.emit_db_tags);
    }

    #[test]
    fn test_explicit_options() {
        let options = Options::from_value(json!({
            "module": "Shop::Db",
            "emit_db_tags": true,
            "emit_boolean_question_getters": true,
            "generate_connection_manager": true,
            "generate_repositories": true
        }))
        .unwrap();

        assert_eq!(options.module, "Shop::Db");
        assert!(options.emit_db_tags);
        assert!(options.emit_boolean_question_getters);
        assert!(options.generate_connection_manager);
        assert!(options.generate_repositories);
    }

    #[test]
    fn test_malformed_payload_is_fatal() {
        let result = Options::from_value(json!("not an object"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_wrongly_typed_field_is_fatal() {
        let result = Options::from_value(json!({"emit_json_tags": "yes"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options = Options::from_value(json!({"frobnicate": true})).unwrap();
        assert_eq!(options.module, "Db");
    }
}
