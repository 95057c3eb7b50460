//! Options parsing for CRUD protobuf extensions
//!
//! This module handles parsing of `(crud.message)` and `(crud.field)` options
//! from protobuf descriptors.
//!
//! prost drops unknown extension fields when it decodes a
//! `CodeGeneratorRequest`, so options reach us in one of two ways:
//!
//! - from the raw request bytes, decoded with prost-reflect against the
//!   descriptor set compiled from `proto/crud/options.proto` and collected
//!   into an [`OptionsIndex`];
//! - from `uninterpreted_option` entries on the descriptors themselves, which
//!   is how tests and hand-built requests supply them.

use once_cell::sync::Lazy;
use prost_reflect::{DescriptorPool, DynamicMessage, Value};
use prost_types::{DescriptorProto, FieldDescriptorProto, UninterpretedOption};
use std::collections::HashMap;

/// Generated option types from `proto/crud/options.proto`
#[allow(missing_docs)]
pub mod crud {
    include!(concat!(env!("OUT_DIR"), "/crud.rs"));
}

/// File descriptor set bytes generated at build time by protoc
static FILE_DESCRIPTOR_SET_BYTES: &[u8] =
    include_bytes!(concat!(env!("OUT_DIR"), "/file_descriptor_set.bin"));

/// Extension name for message options
const MESSAGE_EXTENSION_NAME: &str = "crud.message";

/// Extension name for field options
const FIELD_EXTENSION_NAME: &str = "crud.field";

/// Lazily initialized descriptor pool with our extension definitions
static DESCRIPTOR_POOL: Lazy<DescriptorPool> = Lazy::new(|| {
    DescriptorPool::decode(FILE_DESCRIPTOR_SET_BYTES).expect("Failed to decode file descriptor set")
});

/// Options decoded from the raw bytes of one plugin request
///
/// Built once per run and handed to the schema builder; lookups fall back
/// to `uninterpreted_option` when an entry is missing.
#[derive(Debug, Default, Clone)]
pub struct OptionsIndex {
    /// (file_name, message_name) -> MessageOptions
    message_options: HashMap<(String, String), crud::MessageOptions>,
    /// (file_name, message_name, field_number) -> FieldOptions
    field_options: HashMap<(String, String, i32), crud::FieldOptions>,
}

impl OptionsIndex {
    /// Decode a raw `CodeGeneratorRequest` and collect every CRUD option in it
    pub fn from_request_bytes(bytes: &[u8]) -> Result<Self, String> {
        let request_desc = DESCRIPTOR_POOL
            .get_message_by_name("google.protobuf.compiler.CodeGeneratorRequest")
            .ok_or("CodeGeneratorRequest not found in descriptor pool")?;

        let request = DynamicMessage::decode(request_desc, bytes)
            .map_err(|e| format!("Failed to decode CodeGeneratorRequest: {}", e))?;

        let mut index = Self::default();
        if let Some(cow) = request.get_field_by_name("proto_file") {
            if let Value::List(files) = cow.as_ref() {
                for file_msg in files.iter().filter_map(Value::as_message) {
                    index.extract_file(file_msg);
                }
            }
        }

        Ok(index)
    }

    fn extract_file(&mut self, file: &DynamicMessage) {
        let file_name = string_field(file, "name");

        if let Some(cow) = file.get_field_by_name("message_type") {
            if let Value::List(messages) = cow.as_ref() {
                for msg in messages.iter().filter_map(Value::as_message) {
                    self.extract_message(&file_name, msg, "");
                }
            }
        }
    }

    fn extract_message(&mut self, file_name: &str, msg: &DynamicMessage, parent_prefix: &str) {
        let msg_name = string_field(msg, "name");
        let full_name = if parent_prefix.is_empty() {
            msg_name
        } else {
            format!("{}.{}", parent_prefix, msg_name)
        };

        if let Some(ext_value) = extension_value(msg, MESSAGE_EXTENSION_NAME) {
            if let Some(opts) = convert_to_message_options(&ext_value) {
                self.message_options
                    .insert((file_name.to_string(), full_name.clone()), opts);
            }
        }

        if let Some(cow) = msg.get_field_by_name("field") {
            if let Value::List(fields) = cow.as_ref() {
                for field_msg in fields.iter().filter_map(Value::as_message) {
                    let number = field_msg
                        .get_field_by_name("number")
                        .and_then(|v| v.as_ref().as_i32())
                        .unwrap_or(0);

                    if let Some(ext_value) = extension_value(field_msg, FIELD_EXTENSION_NAME) {
                        if let Some(opts) = convert_to_field_options(&ext_value) {
                            self.field_options
                                .insert((file_name.to_string(), full_name.clone(), number), opts);
                        }
                    }
                }
            }
        }

        if let Some(cow) = msg.get_field_by_name("nested_type") {
            if let Value::List(nested) = cow.as_ref() {
                for nested_msg in nested.iter().filter_map(Value::as_message) {
                    self.extract_message(file_name, nested_msg, &full_name);
                }
            }
        }
    }

    /// Resolve message options, preferring decoded extensions
    pub fn message_options(
        &self,
        file_name: &str,
        msg_name: &str,
        desc: &DescriptorProto,
    ) -> Option<crud::MessageOptions> {
        self.message_options
            .get(&(file_name.to_string(), msg_name.to_string()))
            .cloned()
            .or_else(|| parse_message_options(desc))
    }

    /// Resolve field options, preferring decoded extensions
    pub fn field_options(
        &self,
        file_name: &str,
        msg_name: &str,
        field: &FieldDescriptorProto,
    ) -> Option<crud::FieldOptions> {
        let number = field.number.unwrap_or(0);
        self.field_options
            .get(&(file_name.to_string(), msg_name.to_string(), number))
            .cloned()
            .or_else(|| parse_field_options(field))
    }

    /// Whether no option was decoded from raw bytes
    pub fn is_empty(&self) -> bool {
        self.message_options.is_empty() && self.field_options.is_empty()
    }
}

fn string_field(msg: &DynamicMessage, name: &str) -> String {
    msg.get_field_by_name(name)
        .and_then(|v| v.as_ref().as_str().map(|s| s.to_string()))
        .unwrap_or_default()
}

/// Fetch an extension value from the `options` submessage of a descriptor
fn extension_value(desc: &DynamicMessage, extension_name: &str) -> Option<Value> {
    let cow = desc.get_field_by_name("options")?;
    let opts_msg = cow.as_ref().as_message()?;
    let ext_field = DESCRIPTOR_POOL.get_extension_by_name(extension_name)?;
    if !opts_msg.has_extension(&ext_field) {
        return None;
    }
    Some(opts_msg.get_extension(&ext_field).into_owned())
}

/// Parse CRUD message options from a DescriptorProto's uninterpreted options
pub fn parse_message_options(desc: &DescriptorProto) -> Option<crud::MessageOptions> {
    let opts = desc.options.as_ref()?;
    parse_message_options_from_uninterpreted(&opts.uninterpreted_option)
}

/// Parse CRUD field options from a FieldDescriptorProto's uninterpreted options
pub fn parse_field_options(field: &FieldDescriptorProto) -> Option<crud::FieldOptions> {
    let opts = field.options.as_ref()?;
    parse_field_options_from_uninterpreted(&opts.uninterpreted_option)
}

// =============================================================================
// Value conversion helpers
// =============================================================================

/// Convert a prost-reflect Value to our MessageOptions type
fn convert_to_message_options(value: &Value) -> Option<crud::MessageOptions> {
    let msg = value.as_message()?;
    let mut result = crud::MessageOptions::default();

    if let Some(b) = bool_field(msg, "model") {
        result.model = b;
    }
    if let Some(b) = bool_field(msg, "crud") {
        result.crud = b;
    }
    if let Some(cow) = msg.get_field_by_name("table") {
        if let Value::String(s) = cow.as_ref() {
            result.table = s.clone();
        }
    }

    Some(result)
}

/// Convert a prost-reflect Value to our FieldOptions type
fn convert_to_field_options(value: &Value) -> Option<crud::FieldOptions> {
    let msg = value.as_message()?;
    let mut result = crud::FieldOptions::default();

    if let Some(b) = bool_field(msg, "primary_key") {
        result.primary_key = b;
    }
    if let Some(cow) = msg.get_field_by_name("column") {
        if let Value::String(s) = cow.as_ref() {
            result.column = s.clone();
        }
    }
    if let Some(b) = bool_field(msg, "unique") {
        result.unique = b;
    }
    if let Some(b) = bool_field(msg, "not_null") {
        result.not_null = b;
    }

    Some(result)
}

fn bool_field(msg: &DynamicMessage, name: &str) -> Option<bool> {
    msg.get_field_by_name(name).and_then(|v| v.as_ref().as_bool())
}

// =============================================================================
// Fallback parsing from uninterpreted_option
// =============================================================================

/// Parse MessageOptions from uninterpreted options
fn parse_message_options_from_uninterpreted(
    uninterpreted: &[UninterpretedOption],
) -> Option<crud::MessageOptions> {
    let mut result = crud::MessageOptions::default();
    let mut found = false;

    for opt in uninterpreted {
        if is_extension_option(opt, MESSAGE_EXTENSION_NAME) {
            found = true;
            apply_message_option(&mut result, opt);
        }
    }

    found.then_some(result)
}

/// Parse FieldOptions from uninterpreted options
fn parse_field_options_from_uninterpreted(
    uninterpreted: &[UninterpretedOption],
) -> Option<crud::FieldOptions> {
    let mut result = crud::FieldOptions::default();
    let mut found = false;

    for opt in uninterpreted {
        if is_extension_option(opt, FIELD_EXTENSION_NAME) {
            found = true;
            apply_field_option(&mut result, opt);
        }
    }

    found.then_some(result)
}

/// Check if an uninterpreted option matches our extension name
fn is_extension_option(opt: &UninterpretedOption, extension_name: &str) -> bool {
    // The name parts form a path like: (crud.field).primary_key
    // or just (crud.field) for aggregate values
    match opt.name.first() {
        Some(first) => first.is_extension && first.name_part == extension_name,
        None => false,
    }
}

/// Get the sub-field name from an uninterpreted option (e.g., "column" from "(crud.field).column")
fn get_subfield_name(opt: &UninterpretedOption) -> Option<&str> {
    opt.name.get(1).map(|part| part.name_part.as_str())
}

/// Apply a single uninterpreted option to MessageOptions
fn apply_message_option(result: &mut crud::MessageOptions, opt: &UninterpretedOption) {
    if let Some(aggregate) = opt.aggregate_value.as_ref() {
        // Aggregate value like: model: true, crud: true
        for (key, value) in aggregate_pairs(aggregate) {
            set_message_option(result, key, OptionValue::Text(value));
        }
    } else if let Some(field_name) = get_subfield_name(opt) {
        // Individual setting like (crud.message).table = "users"
        set_message_option(result, field_name, OptionValue::Uninterpreted(opt));
    }
}

/// Apply a single uninterpreted option to FieldOptions
fn apply_field_option(result: &mut crud::FieldOptions, opt: &UninterpretedOption) {
    if let Some(aggregate) = opt.aggregate_value.as_ref() {
        for (key, value) in aggregate_pairs(aggregate) {
            set_field_option(result, key, OptionValue::Text(value));
        }
    } else if let Some(field_name) = get_subfield_name(opt) {
        set_field_option(result, field_name, OptionValue::Uninterpreted(opt));
    }
}

/// An option value in either of its uninterpreted encodings
enum OptionValue<'a> {
    /// Text from an aggregate like `primary_key: true`
    Text(&'a str),
    /// A scalar carried on the option itself
    Uninterpreted(&'a UninterpretedOption),
}

impl OptionValue<'_> {
    fn as_bool(&self) -> bool {
        match self {
            OptionValue::Text(v) => *v == "true",
            OptionValue::Uninterpreted(opt) => parse_bool_option(opt),
        }
    }

    fn as_string(&self) -> String {
        match self {
            OptionValue::Text(v) => parse_quoted_string(v),
            OptionValue::Uninterpreted(opt) => parse_string_option(opt),
        }
    }
}

fn set_message_option(result: &mut crud::MessageOptions, key: &str, value: OptionValue<'_>) {
    match key {
        "model" => result.model = value.as_bool(),
        "crud" => result.crud = value.as_bool(),
        "table" => result.table = value.as_string(),
        _ => {}
    }
}

fn set_field_option(result: &mut crud::FieldOptions, key: &str, value: OptionValue<'_>) {
    match key {
        "primary_key" => result.primary_key = value.as_bool(),
        "column" => result.column = value.as_string(),
        "unique" => result.unique = value.as_bool(),
        "not_null" => result.not_null = value.as_bool(),
        _ => {}
    }
}

/// Parse a boolean value from an uninterpreted option
fn parse_bool_option(opt: &UninterpretedOption) -> bool {
    if let Some(ref v) = opt.identifier_value {
        return v == "true";
    }
    if let Some(v) = opt.positive_int_value {
        return v != 0;
    }
    false
}

/// Parse a string value from an uninterpreted option
fn parse_string_option(opt: &UninterpretedOption) -> String {
    if let Some(ref s) = opt.string_value {
        return String::from_utf8_lossy(s).to_string();
    }
    if let Some(ref s) = opt.identifier_value {
        return s.clone();
    }
    String::new()
}

/// Split an aggregate text value into `key: value` pairs
///
/// Commas inside quoted strings do not split. protoc also accepts
/// whitespace or `;` as separators between pairs.
fn aggregate_pairs(aggregate: &str) -> Vec<(&str, &str)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;

    for (i, c) in aggregate.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ',' | ';' | '\n') => {
                parts.push(&aggregate[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < aggregate.len() {
        parts.push(&aggregate[start..]);
    }

    parts
        .into_iter()
        .flat_map(split_whitespace_pairs)
        .collect()
}

/// Split `a: true b: "x"` (whitespace separated pairs) into individual pairs
fn split_whitespace_pairs(part: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    let mut rest = part.trim();

    while let Some((key, after)) = rest.split_once(':') {
        let after = after.trim_start();
        let end = if after.starts_with('"') || after.starts_with('\'') {
            let q = after.as_bytes()[0] as char;
            after[1..].find(q).map_or(after.len(), |idx| idx + 2)
        } else {
            after.find(char::is_whitespace).unwrap_or(after.len())
        };
        pairs.push((key.trim(), after[..end].trim()));
        rest = after[end..].trim_start();
    }

    pairs
}

/// Parse a quoted string value, removing quotes
fn parse_quoted_string(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
