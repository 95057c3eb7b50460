//! Code generation for mapped models and CRUD bindings
//!
//! Generation runs in two stages: [`plan`] turns the schema model into a
//! declarative description of every emitted item, and [`rust`] prints that
//! description as Rust source.

pub mod column;
pub mod plan;
pub mod rust;

use crate::config::GeneratorConfig;
use crate::schema::Message;
use crate::GeneratorError;
use prost_types::compiler::code_generator_response::File;

/// Settings every printer call receives
#[derive(Debug, Clone)]
pub struct GenContext {
    runtime: syn::Path,
    config: GeneratorConfig,
}

impl GenContext {
    /// Build the context for one run
    pub fn new(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let runtime = syn::parse_str::<syn::Path>(&config.runtime_path).map_err(|e| {
            GeneratorError::InvalidConfig(format!(
                "runtime `{}` is not a Rust path: {}",
                config.runtime_path, e
            ))
        })?;
        Ok(Self {
            runtime,
            config: config.clone(),
        })
    }

    /// Path generated code uses to reach the runtime module
    pub fn runtime(&self) -> &syn::Path {
        &self.runtime
    }

    /// Run configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

/// Generate the output file for one proto file
///
/// Returns None if the file maps no messages
pub fn generate_file(
    cx: &GenContext,
    source: &str,
    messages: &[Message],
) -> Result<Option<File>, GeneratorError> {
    if messages.is_empty() {
        return Ok(None);
    }

    let plan = plan::plan_file(source, messages)?;
    let content = rust::render(cx, &plan)?;

    Ok(Some(File {
        name: Some(cx.config().output_name(source)),
        content: Some(content),
        ..Default::default()
    }))
}
