//! protoc-gen-crud library
//!
//! This crate provides the code generation logic for turning annotated
//! Protocol Buffer messages into mapped models and CRUD bindings, together
//! with the [`runtime`] module the generated code links against.

#![deny(missing_docs)]

pub mod codegen;
pub mod config;
pub mod generator;
pub mod options;
pub mod runtime;
pub mod schema;
pub mod translate;
pub mod types;

use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use thiserror::Error;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Failed to parse protobuf options/extensions
    #[error("Failed to parse options: {0}")]
    OptionsParseError(String),

    /// Invalid plugin configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// General code generation failure
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to decode protobuf message
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The annotated schema violates a persistence rule
    #[error(transparent)]
    Schema(#[from] schema::SchemaError),

    /// A field path could not be translated to a column
    #[error(transparent)]
    Translate(#[from] translate::TranslateError),
}

/// Generate CRUD code from a protobuf CodeGeneratorRequest
///
/// This is the main entry point for the code generator.
pub fn generate(request: CodeGeneratorRequest) -> Result<CodeGeneratorResponse, GeneratorError> {
    generator::generate(request)
}

/// Generate CRUD code from raw protobuf bytes
///
/// This entry point preserves extension data by using prost-reflect for decoding.
pub fn generate_from_bytes(bytes: &[u8]) -> Result<CodeGeneratorResponse, GeneratorError> {
    generator::generate_from_bytes(bytes)
}
