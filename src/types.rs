//! Protobuf to Rust type mapping
//!
//! Mirrors the naming and type choices prost makes for generated structs, so
//! that emitted code can address record fields directly.

use heck::{ToSnakeCase, ToUpperCamelCase};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{FieldDescriptorProto, FileDescriptorProto};

/// How an unset value of a column type is recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroValue {
    /// `0` for every integer width and for enums
    Integer,
    /// `0.0`
    Float,
    /// `false`
    Bool,
    /// Empty `String`
    String,
    /// Empty `Vec<u8>`
    Bytes,
}

/// The Rust shape of a single-column protobuf field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    /// Rust type of the value, without any `Option` wrapper
    pub rust_type: String,
    /// Zero value of `rust_type`
    pub zero: ZeroValue,
    /// Whether prost wraps the value in `Option` (explicit presence)
    pub is_optional_reference: bool,
}

impl MappedType {
    /// Full Rust type as it appears on the record struct
    pub fn field_type(&self) -> String {
        if self.is_optional_reference {
            format!("Option<{}>", self.rust_type)
        } else {
            self.rust_type.clone()
        }
    }
}

/// Syntax of the file declaring a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// `proto2`, also assumed when the file declares no syntax
    Proto2,
    /// `proto3`
    Proto3,
}

impl Syntax {
    /// Syntax declared by `file`
    pub fn of(file: &FileDescriptorProto) -> Self {
        match file.syntax() {
            "proto3" => Syntax::Proto3,
            _ => Syntax::Proto2,
        }
    }
}

/// Why a field cannot be mapped onto a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// Repeated or map fields
    Repeated,
    /// Message-typed fields
    Message,
    /// Proto2 groups
    Group,
    /// Members of a real (non-synthetic) oneof
    Oneof,
}

impl std::fmt::Display for Unsupported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unsupported::Repeated => f.write_str("repeated fields"),
            Unsupported::Message => f.write_str("message-typed fields"),
            Unsupported::Group => f.write_str("groups"),
            Unsupported::Oneof => f.write_str("oneof members"),
        }
    }
}

/// Map a field descriptor onto its column type
///
/// proto2 `optional` and proto3 `optional` scalars both become `Option<T>`
/// on the prost struct; proto2 `required` and plain proto3 scalars do not.
pub fn map_field(field: &FieldDescriptorProto, syntax: Syntax) -> Result<MappedType, Unsupported> {
    if field.label() == Label::Repeated {
        return Err(Unsupported::Repeated);
    }
    // proto3 `optional` is encoded as a synthetic single-member oneof
    if field.oneof_index.is_some() && !field.proto3_optional() {
        return Err(Unsupported::Oneof);
    }

    let (rust_type, zero) = match field.r#type() {
        Type::Double => ("f64", ZeroValue::Float),
        Type::Float => ("f32", ZeroValue::Float),
        Type::Int64 | Type::Sint64 | Type::Sfixed64 => ("i64", ZeroValue::Integer),
        Type::Uint64 | Type::Fixed64 => ("u64", ZeroValue::Integer),
        Type::Int32 | Type::Sint32 | Type::Sfixed32 | Type::Enum => ("i32", ZeroValue::Integer),
        Type::Uint32 | Type::Fixed32 => ("u32", ZeroValue::Integer),
        Type::Bool => ("bool", ZeroValue::Bool),
        Type::String => ("String", ZeroValue::String),
        Type::Bytes => ("Vec<u8>", ZeroValue::Bytes),
        Type::Message => return Err(Unsupported::Message),
        Type::Group => return Err(Unsupported::Group),
    };

    Ok(MappedType {
        rust_type: rust_type.to_string(),
        zero,
        is_optional_reference: match syntax {
            Syntax::Proto3 => field.proto3_optional(),
            Syntax::Proto2 => field.label() == Label::Optional,
        },
    })
}

/// Struct name prost generates for a message
pub fn record_name(message_name: &str) -> String {
    message_name.to_upper_camel_case()
}

/// Field name prost generates, without raw-identifier escaping
pub fn field_name(proto_name: &str) -> String {
    proto_name.to_snake_case()
}

/// Whether `name` must be written as a raw identifier (`r#type`)
pub fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "as" | "break" | "const" | "continue" | "else" | "enum" | "false" | "fn" | "for"
            | "if" | "impl" | "in" | "let" | "loop" | "match" | "mod" | "move" | "mut"
            | "pub" | "ref" | "return" | "static" | "struct" | "trait" | "true" | "type"
            | "unsafe" | "use" | "where" | "while" | "abstract" | "become" | "box" | "do"
            | "final" | "macro" | "override" | "priv" | "typeof" | "unsized" | "virtual"
            | "yield" | "async" | "await" | "dyn" | "try" | "gen"
    )
}
