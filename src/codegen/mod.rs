//! Code generation
//!
//! One full request in, one ordered collection of named file contents out.
//! The run is a synchronous batch transform: the struct registry is built
//! first (tables, then query result shapes), every query method is resolved
//! against it, and only then is anything rendered.

pub mod facade;
pub mod queries;
pub mod registry;
pub mod render;
pub mod strings;
pub mod types;

use tracing::{debug, info};

use crate::config::Options;
use crate::error::CrystalgenError;
use crate::request::{Dialect, GenerateRequest, GenerateResponse, GeneratedFile};

use queries::QueryMethod;
use registry::StructRegistry;
use render::Renderer;
use types::TypeMapper;

/// Generates Crystal code from one generate request
pub struct Generator {
    req: GenerateRequest,
    options: Options,
    dialect: Dialect,
}

impl Generator {
    pub fn new(req: GenerateRequest, options: Options) -> Self {
        let dialect = Dialect::from_engine_lossy(&req.settings.engine);
        Self {
            req,
            options,
            dialect,
        }
    }

    /// Run the full generation pass
    pub fn generate(&self) -> Result<GenerateResponse, CrystalgenError> {
        info!(
            dialect = ?self.dialect,
            schemas = self.req.catalog.schemas.len(),
            queries = self.req.queries.len(),
            "Starting code generation"
        );

        let mapper = TypeMapper::new(self.dialect, self.options.emit_result_struct_pointers);
        let registry = StructRegistry::build(&self.req, &mapper);
        let methods: Vec<QueryMethod> = self
            .req
            .queries
            .iter()
            .map(|query| QueryMethod::build(query, &mapper, &registry, self.dialect))
            .collect();

        let renderer = Renderer::new(&self.options);
        let mut resp = GenerateResponse::default();

        let structs = registry.structs_sorted();
        if !structs.is_empty() {
            resp.files.push(GeneratedFile {
                name: "models.cr".to_string(),
                contents: renderer.render_models(&structs)?,
            });
            debug!("Generated models file");
        }

        if !methods.is_empty() {
            resp.files.push(GeneratedFile {
                name: "queries.cr".to_string(),
                contents: renderer.render_queries(&methods)?,
            });
            debug!("Generated queries file");
        }

        if self.options.generate_connection_manager {
            resp.files.push(GeneratedFile {
                name: "database.cr".to_string(),
                contents: renderer.render_database()?,
            });
            debug!("Generated connection manager file");
        }

        if self.options.generate_repositories {
            for table_facade in facade::group_by_table(&self.req.queries, &methods) {
                let name = format!(
                    "repositories/{}_repository.cr",
                    strings::to_snake_case(&table_facade.table)
                );
                resp.files.push(GeneratedFile {
                    contents: renderer.render_repository(&table_facade)?,
                    name,
                });
            }
            debug!("Generated repository files");
        }

        info!(files = resp.files.len(), "Code generation complete");
        Ok(resp)
    }
}
