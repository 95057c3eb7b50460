//! protoc-gen-crud - A protoc plugin for generating CRUD bindings
//!
//! This binary reads a CodeGeneratorRequest from stdin and writes a
//! CodeGeneratorResponse to stdout, following the protoc plugin protocol.
//! Logs go to stderr, filtered by `PROTOC_GEN_CRUD_LOG`.

use prost::Message;
use prost_types::compiler::CodeGeneratorResponse;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        tracing::error!(error = %e, "plugin failed");
        eprintln!("protoc-gen-crud: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("PROTOC_GEN_CRUD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;

    // Schema errors are reported through the response, not the exit code
    let response = protoc_gen_crud::generate_from_bytes(&buf).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "generation failed");
        CodeGeneratorResponse {
            error: Some(e.to_string()),
            ..Default::default()
        }
    });

    tracing::debug!(files = response.file.len(), "writing response");

    let mut out = Vec::new();
    response.encode(&mut out)?;
    io::stdout().write_all(&out)?;

    Ok(())
}
