//! Build script for protoc-gen-crud
//!
//! This compiles proto/crud/options.proto to generate the Rust types for the
//! `(crud.message)` and `(crud.field)` extensions, and writes the descriptor
//! set used to decode those extensions from raw plugin requests.

use std::io::{Error, ErrorKind, Result};
use std::path::PathBuf;

fn main() -> Result<()> {
    let out_dir = std::env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| Error::new(ErrorKind::NotFound, "OUT_DIR is not set"))?;

    prost_build::Config::new()
        .file_descriptor_set_path(out_dir.join("file_descriptor_set.bin"))
        .compile_protos(&["proto/crud/options.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/crud/options.proto");

    Ok(())
}
