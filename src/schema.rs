//! Schema model
//!
//! An immutable view of the mapped messages of one proto file, built once per
//! run from descriptors and resolved options. All persistence rules that can
//! be checked statically are checked here, so that schema authors get an
//! error from protoc rather than from generated code.

use crate::options::OptionsIndex;
use crate::translate::{ColumnMap, TranslateError};
use crate::types::{self, MappedType, Syntax, Unsupported};
use heck::ToSnakeCase;
use prost_types::{DescriptorProto, FileDescriptorProto};
use thiserror::Error;

/// Errors found while building the schema model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A CRUD-enabled message has no primary-key field
    #[error("no primary key on message {message}")]
    MissingPrimaryKey {
        /// Message name
        message: String,
    },

    /// A CRUD-enabled message has several primary-key fields
    #[error("message {message} has {} primary keys ({}), expected exactly one", .fields.len(), .fields.join(", "))]
    MultiplePrimaryKeys {
        /// Message name
        message: String,
        /// Fields flagged as primary key
        fields: Vec<String>,
    },

    /// A field of a mapped message cannot be stored in one column
    #[error("field {message}.{field}: {reason} cannot be mapped to a column")]
    UnsupportedField {
        /// Message name
        message: String,
        /// Field name
        field: String,
        /// What kind of field it is
        reason: Unsupported,
    },

    /// A descriptor is missing its name
    #[error("descriptor without a name in {0}")]
    Unnamed(String),

    /// Column table construction failed
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// A mapped field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Declared protobuf name, also the field-mask path
    pub name: String,
    /// Field name on the prost struct (unescaped)
    pub rust_name: String,
    /// `(crud.field).column`, if set and non-empty
    pub column_override: Option<String>,
    /// Whether this field identifies the row
    pub primary_key: bool,
    /// Unique constraint
    pub unique: bool,
    /// NOT NULL constraint
    pub not_null: bool,
    /// Column type
    pub ty: MappedType,
}

impl Field {
    /// Resolved column name
    pub fn column(&self) -> &str {
        self.column_override.as_deref().unwrap_or(&self.name)
    }
}

/// A mapped message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Declared protobuf name
    pub name: String,
    /// Name of the prost struct
    pub record_name: String,
    /// Name of the generated mapped-model struct
    pub model_name: String,
    /// Table name
    pub table: String,
    /// Whether CRUD operations are generated
    pub crud: bool,
    /// Fields in declaration order
    pub fields: Vec<Field>,
    columns: ColumnMap,
    primary_key: Option<usize>,
}

impl Message {
    /// The primary-key field
    ///
    /// Always `Some` for CRUD-enabled messages.
    pub fn primary_key(&self) -> Option<&Field> {
        self.primary_key.map(|idx| &self.fields[idx])
    }

    /// Resolve one field-mask path to its column
    pub fn column(&self, path: &str) -> Result<&str, TranslateError> {
        self.columns.column(path)
    }

    /// Resolve field-mask paths to columns, preserving order
    pub fn columns<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<&str>, TranslateError> {
        self.columns.columns(paths)
    }
}

/// Build the mapped messages of one file
///
/// Messages without `(crud.message)` `model` or `crud` set are not part of
/// the model. Top-level messages only, in declaration order.
pub fn build(file: &FileDescriptorProto, index: &OptionsIndex) -> Result<Vec<Message>, SchemaError> {
    let file_name = file.name.as_deref().unwrap_or_default();
    let syntax = Syntax::of(file);
    let mut messages = Vec::new();

    for desc in &file.message_type {
        let name = desc
            .name
            .clone()
            .ok_or_else(|| SchemaError::Unnamed(file_name.to_string()))?;

        let Some(opts) = index.message_options(file_name, &name, desc) else {
            tracing::debug!(message = %name, "no crud options, skipping");
            continue;
        };
        if !opts.model && !opts.crud {
            tracing::debug!(message = %name, "model and crud disabled, skipping");
            continue;
        }

        let message = build_message(file_name, syntax, &name, desc, &opts, index)?;
        tracing::debug!(
            message = %message.name,
            table = %message.table,
            crud = message.crud,
            fields = message.fields.len(),
            "mapped message"
        );
        messages.push(message);
    }

    Ok(messages)
}

fn build_message(
    file_name: &str,
    syntax: Syntax,
    name: &str,
    desc: &DescriptorProto,
    opts: &crate::options::crud::MessageOptions,
    index: &OptionsIndex,
) -> Result<Message, SchemaError> {
    let mut fields = Vec::with_capacity(desc.field.len());

    for field_desc in &desc.field {
        let field_name = field_desc
            .name
            .clone()
            .ok_or_else(|| SchemaError::Unnamed(format!("{}.{}", file_name, name)))?;

        let ty = types::map_field(field_desc, syntax).map_err(|reason| SchemaError::UnsupportedField {
            message: name.to_string(),
            field: field_name.clone(),
            reason,
        })?;

        let field_opts = index
            .field_options(file_name, name, field_desc)
            .unwrap_or_default();

        fields.push(Field {
            rust_name: types::field_name(&field_name),
            column_override: Some(field_opts.column).filter(|c| !c.is_empty()),
            primary_key: field_opts.primary_key,
            unique: field_opts.unique,
            not_null: field_opts.not_null,
            ty,
            name: field_name,
        });
    }

    let primary_keys: Vec<usize> = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.primary_key)
        .map(|(idx, _)| idx)
        .collect();

    // `crud` implies `model`; the primary-key rule only binds CRUD messages.
    let primary_key = match (opts.crud, primary_keys.as_slice()) {
        (_, [idx]) => Some(*idx),
        (false, []) => None,
        (true, []) => {
            return Err(SchemaError::MissingPrimaryKey {
                message: name.to_string(),
            })
        }
        (false, _) => None,
        (true, many) => {
            return Err(SchemaError::MultiplePrimaryKeys {
                message: name.to_string(),
                fields: many.iter().map(|idx| fields[*idx].name.clone()).collect(),
            })
        }
    };

    let columns = ColumnMap::build(
        name,
        fields
            .iter()
            .map(|f| (f.name.clone(), f.column().to_string())),
    )?;

    let table = if opts.table.is_empty() {
        name.to_snake_case()
    } else {
        opts.table.clone()
    };

    let record_name = types::record_name(name);
    Ok(Message {
        name: name.to_string(),
        model_name: format!("{}Model", record_name),
        record_name,
        table,
        crud: opts.crud,
        fields,
        columns,
        primary_key,
    })
}
