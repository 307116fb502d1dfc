//! Text emission
//!
//! A pure function from the resolved model to output text. Templates are
//! embedded at compile time and rendered through one minijinja environment;
//! rendering an identical model twice yields byte-identical output. All type
//! and dedup decisions happen upstream; nothing is re-derived here.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::codegen::facade::TableFacade;
use crate::codegen::queries::QueryMethod;
use crate::codegen::registry::StructDescriptor;
use crate::codegen::strings::{module_name, to_pascal_case};
use crate::config::Options;
use crate::error::CrystalgenError;

/// Renders the resolved model into Crystal source text
pub struct Renderer {
    env: Environment<'static>,
    options: Options,
}

#[derive(Serialize)]
struct StructContext<'a> {
    name: &'a str,
    fields: Vec<FieldContext<'a>>,
}

#[derive(Serialize)]
struct FieldContext<'a> {
    name: &'a str,
    db_name: &'a str,
    #[serde(rename = "type")]
    typ: &'a str,
    is_bool: bool,
}

impl Renderer {
    pub fn new(options: &Options) -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        env.add_template("models", include_str!("templates/models.cr.jinja"))
            .expect("Failed to load models template");
        env.add_template("queries", include_str!("templates/queries.cr.jinja"))
            .expect("Failed to load queries template");
        env.add_template("database", include_str!("templates/database.cr.jinja"))
            .expect("Failed to load database template");
        env.add_template("repository", include_str!("templates/repository.cr.jinja"))
            .expect("Failed to load repository template");

        Self {
            env,
            options: options.clone(),
        }
    }

    /// Render the models file from the registered structs
    pub fn render_models(&self, structs: &[&StructDescriptor]) -> Result<String, CrystalgenError> {
        let structs_ctx: Vec<StructContext> = structs
            .iter()
            .map(|s| StructContext {
                name: &s.name,
                fields: s
                    .fields
                    .iter()
                    .map(|f| FieldContext {
                        name: &f.name,
                        db_name: &f.db_name,
                        typ: &f.typ,
                        is_bool: is_boolean_type(&f.typ),
                    })
                    .collect(),
            })
            .collect();

        self.render(
            "models.cr",
            "models",
            context! {
                module => module_name(&self.options.module),
                structs => structs_ctx,
                emit_json_tags => self.options.emit_json_tags,
                emit_yaml_tags => self.options.emit_yaml_tags,
                emit_db_tags => self.options.emit_db_tags,
                emit_question_getters => self.options.emit_boolean_question_getters,
            },
        )
    }

    /// Render the queries file from the resolved query methods
    pub fn render_queries(&self, methods: &[QueryMethod]) -> Result<String, CrystalgenError> {
        self.render(
            "queries.cr",
            "queries",
            context! {
                module => module_name(&self.options.module),
                queries => methods,
            },
        )
    }

    /// Render the connection manager file
    pub fn render_database(&self) -> Result<String, CrystalgenError> {
        self.render(
            "database.cr",
            "database",
            context! {
                module => module_name(&self.options.module),
                generate_repositories => self.options.generate_repositories,
            },
        )
    }

    /// Render one per-table repository file
    pub fn render_repository(&self, facade: &TableFacade) -> Result<String, CrystalgenError> {
        self.render(
            "repository.cr",
            "repository",
            context! {
                module => module_name(&self.options.module),
                repository_name => format!("{}Repository", to_pascal_case(&facade.table)),
                methods => &facade.methods,
            },
        )
    }

    fn render(
        &self,
        file: &str,
        template_name: &str,
        ctx: minijinja::Value,
    ) -> Result<String, CrystalgenError> {
        let template =
            self.env
                .get_template(template_name)
                .map_err(|e| CrystalgenError::Render {
                    file: file.to_string(),
                    message: format!("Template error: {}", e),
                })?;

        template.render(ctx).map_err(|e| CrystalgenError::Render {
            file: file.to_string(),
            message: format!("Render error: {}", e),
        })
    }
}

/// Whether a Crystal type is boolean, for the question-getter option
fn is_boolean_type(typ: &str) -> bool {
    typ == "Bool" || typ == "Bool?"
}
