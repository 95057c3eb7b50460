//! Runtime support for generated CRUD code
//!
//! Code emitted by this plugin never talks to a database directly. It converts
//! records to their mapped [`Model`] form and drives a [`MappingRuntime`],
//! which any relational or document store can implement. This module holds
//! those seams plus the small value types that flow through them.

mod context;
pub mod memory;
mod value;

pub use context::{Context, ContextError};
pub use prost_types::FieldMask;
pub use value::{ConvertError, FromValue, Value};

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by generated CRUD operations
#[derive(Error, Debug)]
pub enum CrudError<E> {
    /// A precondition on the input was violated before touching the store
    #[error("{0}")]
    InvalidArgument(String),

    /// Converting between a record and its mapped form failed
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The mapping runtime returned an error
    #[error(transparent)]
    Store(E),
}

impl<E> CrudError<E> {
    /// Build an [`CrudError::InvalidArgument`] from a message
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CrudError::InvalidArgument(msg.into())
    }

    /// Whether this error was raised by a precondition check
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CrudError::InvalidArgument(_))
    }
}

/// Static description of one column of a mapped model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name in the store
    pub name: &'static str,
    /// Whether this column identifies the row
    pub primary_key: bool,
    /// Whether values must be distinct across rows
    pub unique: bool,
    /// Whether the store should reject NULL in this column
    pub not_null: bool,
}

/// The storage-shaped form of a record
///
/// Implemented by the generated `<Record>Model` types.
pub trait Model: Clone + Default + Send + Sync + 'static {
    /// Table the model is stored in
    const TABLE: &'static str;

    /// Columns in declaration order
    const COLUMNS: &'static [ColumnDef];

    /// Name of the primary-key column
    const PRIMARY_KEY: &'static str;

    /// Every column with its current value, in declaration order
    fn values(&self) -> Vec<(&'static str, Value)>;

    /// Columns holding a non-default value
    ///
    /// This is the query-by-example condition: only explicitly populated
    /// fields constrain a lookup or delete.
    fn example(&self) -> Vec<(&'static str, Value)>;

    /// Assign one column from a stored value
    fn set(&mut self, column: &str, value: Value) -> Result<(), ConvertError>;

    /// Current value of the primary-key column
    fn primary_key(&self) -> Value {
        self.values()
            .into_iter()
            .find(|(column, _)| *column == Self::PRIMARY_KEY)
            .map(|(_, value)| value)
            .unwrap_or(Value::Null)
    }

    /// Rebuild a model from stored `(column, value)` pairs
    ///
    /// Columns that are not present keep their default value.
    fn from_values<I>(values: I) -> Result<Self, ConvertError>
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        let mut model = Self::default();
        for (column, value) in values {
            model.set(column, value)?;
        }
        Ok(model)
    }
}

/// Static schema information of a record type
///
/// Field masks are validated against this.
pub trait Schema {
    /// Declared field names, usable as field-mask paths
    const FIELD_PATHS: &'static [&'static str];
}

/// Field-mask capability consumed by generated `patch` and
/// `with_get_field_mask`
pub trait FieldMaskExt {
    /// Whether every path names a field of `R`
    fn is_valid_for<R: Schema>(&self) -> bool;

    /// The mask's paths in order
    fn mask_paths(&self) -> &[String];
}

impl FieldMaskExt for FieldMask {
    fn is_valid_for<R: Schema>(&self) -> bool {
        self.paths
            .iter()
            .all(|path| R::FIELD_PATHS.contains(&path.as_str()))
    }

    fn mask_paths(&self) -> &[String] {
        &self.paths
    }
}

/// Sort direction for [`Query::order_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

/// An equality constraint on one column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column name
    pub column: &'static str,
    /// Required value
    pub value: Value,
}

/// A pending query, transformed by option functions before execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    columns: Option<Vec<&'static str>>,
    filters: Vec<Filter>,
    order: Vec<(&'static str, Order)>,
    limit: Option<usize>,
}

impl Query {
    /// An unconstrained query selecting every column
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the selected columns
    pub fn select(mut self, columns: Vec<&'static str>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Add an equality constraint
    pub fn filter(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column,
            value: value.into(),
        });
        self
    }

    /// Append a sort key
    pub fn order_by(mut self, column: &'static str, order: Order) -> Self {
        self.order.push((column, order));
        self
    }

    /// Cap the number of returned rows
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Selected columns, `None` meaning all of them
    pub fn columns(&self) -> Option<&[&'static str]> {
        self.columns.as_deref()
    }

    /// Equality constraints
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Sort keys in priority order
    pub fn ordering(&self) -> &[(&'static str, Order)] {
        &self.order
    }

    /// Row cap
    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }
}

/// An option function applied to a pending [`Query`]
pub type QueryOption = Box<dyn FnOnce(Query) -> Query + Send>;

/// Apply options to a fresh query, in order
pub fn apply_options<I>(opts: I) -> Query
where
    I: IntoIterator<Item = QueryOption>,
{
    opts.into_iter().fold(Query::new(), |query, opt| opt(query))
}

/// The store-access capability generated code depends on
///
/// Every call receives the caller's [`Context`] so cancellation and deadlines
/// reach the store.
#[async_trait]
pub trait MappingRuntime: Send + Sync {
    /// Error type surfaced verbatim through [`CrudError::Store`]
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a row and return its persisted form
    async fn insert<M: Model>(&self, ctx: &Context, model: M) -> Result<M, Self::Error>;

    /// Fetch the single row matching `example` by query-by-example, narrowed
    /// further by `query`
    async fn find_by_example<M: Model>(
        &self,
        ctx: &Context,
        example: &M,
        query: Query,
    ) -> Result<M, Self::Error>;

    /// Fetch every row accepted by `query`
    async fn find_all<M: Model>(&self, ctx: &Context, query: Query) -> Result<Vec<M>, Self::Error>;

    /// Insert or fully replace the row with the same primary key
    async fn upsert<M: Model>(&self, ctx: &Context, model: &M) -> Result<(), Self::Error>;

    /// Overwrite `columns` of the row keyed like `target` with the values in
    /// `values`
    async fn update_columns<M: Model>(
        &self,
        ctx: &Context,
        target: &M,
        columns: &[&'static str],
        values: &M,
    ) -> Result<(), Self::Error>;

    /// Delete every row matching `example` by query-by-example
    async fn delete_by_example<M: Model>(&self, ctx: &Context, example: &M)
        -> Result<(), Self::Error>;
}
