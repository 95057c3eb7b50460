//! Plugin parameter parsing
//!
//! protoc passes everything after `--crud_opt=` (or the `opt:` list in
//! buf.gen.yaml) as one comma-separated string of `key=value` pairs.

use crate::GeneratorError;

/// Default path of the runtime module referenced by generated code
pub const DEFAULT_RUNTIME_PATH: &str = "::protoc_gen_crud::runtime";

/// Default suffix replacing `.proto` in output file names
pub const DEFAULT_SUFFIX: &str = ".crud.rs";

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Rust path generated code uses to reach the runtime module
    pub runtime_path: String,
    /// Output file suffix
    pub suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parse the request's `parameter` string
    pub fn parse(parameter: Option<&str>) -> Result<Self, GeneratorError> {
        let mut config = Self::default();
        let Some(parameter) = parameter else {
            return Ok(config);
        };

        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                return Err(GeneratorError::InvalidConfig(format!(
                    "expected key=value, got `{}`",
                    part
                )));
            };
            let value = value.trim();
            if value.is_empty() {
                return Err(GeneratorError::InvalidConfig(format!(
                    "empty value for `{}`",
                    key.trim()
                )));
            }

            match key.trim() {
                "runtime" => {
                    syn::parse_str::<syn::Path>(value).map_err(|e| {
                        GeneratorError::InvalidConfig(format!(
                            "runtime `{}` is not a Rust path: {}",
                            value, e
                        ))
                    })?;
                    config.runtime_path = value.to_string();
                }
                "suffix" => config.suffix = value.to_string(),
                other => {
                    return Err(GeneratorError::InvalidConfig(format!(
                        "unknown parameter `{}`",
                        other
                    )))
                }
            }
        }

        Ok(config)
    }

    /// Output file name for a proto file
    pub fn output_name(&self, proto_file: &str) -> String {
        let stem = proto_file.strip_suffix(".proto").unwrap_or(proto_file);
        format!("{}{}", stem, self.suffix)
    }
}
