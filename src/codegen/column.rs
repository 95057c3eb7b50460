//! Column planning for mapped models
//!
//! Turns a schema field into the column description the printer needs: the
//! resolved column name, its constraints and how an unset value looks.

use crate::schema::{Field, Message};
use crate::translate::TranslateError;
use crate::types::ZeroValue;

/// Column constraints carried into the generated `ColumnDef`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnAttributes {
    /// Row identifier
    pub primary_key: bool,
    /// Unique constraint
    pub unique: bool,
    /// NOT NULL constraint
    pub not_null: bool,
}

/// One column of a mapped model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Field-mask path (declared field name)
    pub path: String,
    /// Field name on the record and model structs
    pub field: String,
    /// Resolved column name
    pub column: String,
    /// Rust type of the struct field, including any `Option`
    pub rust_type: String,
    /// Zero value of the unwrapped type
    pub zero: ZeroValue,
    /// Whether the field is an `Option` (unset is `None`)
    pub optional: bool,
    /// Whether the field type is `Copy`
    pub copy: bool,
    /// Constraints
    pub attributes: ColumnAttributes,
}

/// Plan the column for `field`, resolving its name through the message's
/// column table
pub fn plan_column(message: &Message, field: &Field) -> Result<ColumnPlan, TranslateError> {
    let column = message.column(&field.name)?.to_string();

    Ok(ColumnPlan {
        path: field.name.clone(),
        field: field.rust_name.clone(),
        column,
        rust_type: field.ty.field_type(),
        zero: field.ty.zero,
        optional: field.ty.is_optional_reference,
        copy: !matches!(field.ty.zero, ZeroValue::String | ZeroValue::Bytes),
        attributes: ColumnAttributes {
            primary_key: field.primary_key,
            unique: field.unique,
            // A primary key is never NULL
            not_null: field.not_null || field.primary_key,
        },
    })
}
