//! Request handling
//!
//! Drives one plugin run: parse parameters, build the schema model of every
//! file protoc asked for, and collect the generated files.

use crate::codegen::{self, GenContext};
use crate::config::GeneratorConfig;
use crate::options::OptionsIndex;
use crate::schema;
use crate::GeneratorError;
use prost::Message;
use prost_types::compiler::code_generator_response::Feature;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

/// Generate from an already decoded request
///
/// Extension values were dropped by prost while decoding, so options are
/// read from their uninterpreted form only.
pub fn generate(request: CodeGeneratorRequest) -> Result<CodeGeneratorResponse, GeneratorError> {
    generate_with_index(&request, &OptionsIndex::default())
}

/// Generate from the raw request bytes read from stdin
pub fn generate_from_bytes(bytes: &[u8]) -> Result<CodeGeneratorResponse, GeneratorError> {
    let index = OptionsIndex::from_request_bytes(bytes).map_err(GeneratorError::OptionsParseError)?;
    let request = CodeGeneratorRequest::decode(bytes)
        .map_err(|e| GeneratorError::DecodeError(e.to_string()))?;

    generate_with_index(&request, &index)
}

fn generate_with_index(
    request: &CodeGeneratorRequest,
    index: &OptionsIndex,
) -> Result<CodeGeneratorResponse, GeneratorError> {
    let config = GeneratorConfig::parse(request.parameter.as_deref())?;
    let cx = GenContext::new(&config)?;

    tracing::debug!(
        files = request.file_to_generate.len(),
        runtime = %config.runtime_path,
        decoded_options = !index.is_empty(),
        "generating"
    );

    let mut response = CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    };

    for file_name in &request.file_to_generate {
        let Some(file) = request
            .proto_file
            .iter()
            .find(|f| f.name.as_deref() == Some(file_name.as_str()))
        else {
            return Err(GeneratorError::CodeGenError(format!(
                "{} is listed for generation but missing from the request",
                file_name
            )));
        };

        let messages = schema::build(file, index)?;
        match codegen::generate_file(&cx, file_name, &messages)? {
            Some(generated) => {
                tracing::info!(
                    source = %file_name,
                    output = generated.name.as_deref().unwrap_or_default(),
                    models = messages.len(),
                    "generated"
                );
                response.file.push(generated);
            }
            None => tracing::debug!(source = %file_name, "no mapped messages"),
        }
    }

    Ok(response)
}
