//! Field-mask path to column translation
//!
//! Each message gets a `ColumnMap` when the schema model is built. Paths are
//! the declared protobuf field names; columns are the `(crud.field).column`
//! override when present, otherwise the declared name.

use indexmap::IndexMap;
use thiserror::Error;

/// Errors raised while translating paths or building a column map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The path does not name a field of the message
    #[error("unknown field path `{path}` on message {message}")]
    UnknownPath {
        /// Message the path was resolved against
        message: String,
        /// Offending path
        path: String,
    },

    /// Two fields resolve to the same column
    #[error("fields `{first}` and `{second}` of message {message} both map to column `{column}`")]
    DuplicateColumn {
        /// Message being mapped
        message: String,
        /// Column both fields claim
        column: String,
        /// Field that claimed the column first
        first: String,
        /// Field that claimed it second
        second: String,
    },
}

/// Ordered path to column lookup table for one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    message: String,
    by_path: IndexMap<String, String>,
}

impl ColumnMap {
    /// Build the table from `(path, column)` pairs in declaration order
    ///
    /// Fails if two paths resolve to the same column.
    pub fn build<I>(message: &str, entries: I) -> Result<Self, TranslateError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut by_path: IndexMap<String, String> = IndexMap::new();
        for (path, column) in entries {
            if let Some((first, _)) = by_path.iter().find(|(_, c)| **c == column) {
                return Err(TranslateError::DuplicateColumn {
                    message: message.to_string(),
                    column,
                    first: first.clone(),
                    second: path,
                });
            }
            by_path.insert(path, column);
        }
        Ok(Self {
            message: message.to_string(),
            by_path,
        })
    }

    /// Resolve one path
    pub fn column(&self, path: &str) -> Result<&str, TranslateError> {
        self.by_path
            .get(path)
            .map(String::as_str)
            .ok_or_else(|| TranslateError::UnknownPath {
                message: self.message.clone(),
                path: path.to_string(),
            })
    }

    /// Resolve each path independently, preserving order
    pub fn columns<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<&str>, TranslateError> {
        paths.iter().map(|p| self.column(p.as_ref())).collect()
    }
}
