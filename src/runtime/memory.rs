//! In-memory mapping runtime
//!
//! `MemoryStore` keeps one table per [`Model::TABLE`] behind a tokio
//! `RwLock`. It enforces primary-key and unique constraints, honors column
//! projection, filters, ordering and limits, and follows the usual ORM
//! conventions for the edge cases: a lookup miss is [`MemoryError::NotFound`],
//! a lookup with several matches yields the first row by primary key, a
//! column update that matches no row affects nothing, and a delete without
//! conditions is refused.

use super::{Context, ContextError, ConvertError, MappingRuntime, Model, Order, Query, Value};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::cmp::Ordering;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by [`MemoryStore`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    /// The caller's context stopped admitting work
    #[error(transparent)]
    Context(#[from] ContextError),

    /// No row matched a single-row lookup
    #[error("record not found in {table}")]
    NotFound {
        /// Table searched
        table: &'static str,
    },

    /// A primary-key or unique column would hold a duplicate value
    #[error("duplicate value for {table}.{column}")]
    Duplicate {
        /// Table written
        table: &'static str,
        /// Constrained column
        column: &'static str,
    },

    /// A delete carried no condition and would have emptied the table
    #[error("refusing to delete from {table} without conditions")]
    MissingWhereClause {
        /// Table targeted
        table: &'static str,
    },

    /// A column named in an update does not exist
    #[error("unknown column {table}.{column}")]
    UnknownColumn {
        /// Table targeted
        table: &'static str,
        /// Requested column
        column: String,
    },

    /// A stored row could not be turned back into a model
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

type Row = Vec<(&'static str, Value)>;

/// A [`MappingRuntime`] holding every table in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<IndexMap<&'static str, Vec<Row>>>,
}

impl MemoryStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored for `M`
    pub async fn count<M: Model>(&self) -> usize {
        self.tables
            .read()
            .await
            .get(M::TABLE)
            .map_or(0, Vec::len)
    }

    /// Read the stored row with the given primary key, bypassing any query
    pub async fn row<M: Model>(&self, key: impl Into<Value>) -> Result<Option<M>, MemoryError> {
        let key = key.into();
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(M::TABLE) else {
            return Ok(None);
        };
        rows.iter()
            .find(|row| column_value(row, M::PRIMARY_KEY) == Some(&key))
            .map(|row| project::<M>(row, None))
            .transpose()
    }
}

fn column_value<'r>(row: &'r Row, column: &str) -> Option<&'r Value> {
    row.iter()
        .find(|(name, _)| *name == column)
        .map(|(_, value)| value)
}

fn matches(row: &Row, conditions: &[(&'static str, Value)]) -> bool {
    conditions
        .iter()
        .all(|(column, value)| column_value(row, column) == Some(value))
}

fn project<M: Model>(row: &Row, columns: Option<&[&'static str]>) -> Result<M, MemoryError> {
    let selected = row
        .iter()
        .filter(|(name, _)| columns.map_or(true, |cols| cols.contains(name)))
        .cloned();
    Ok(M::from_values(selected)?)
}

fn compare(a: &Row, b: &Row, ordering: &[(&'static str, Order)]) -> Ordering {
    for (column, order) in ordering {
        let lhs = column_value(a, column);
        let rhs = column_value(b, column);
        let by = lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal);
        let by = match order {
            Order::Asc => by,
            Order::Desc => by.reverse(),
        };
        if by != Ordering::Equal {
            return by;
        }
    }
    Ordering::Equal
}

fn check_constraints<M: Model>(
    rows: &[Row],
    row: &Row,
    skip: Option<usize>,
) -> Result<(), MemoryError> {
    for def in M::COLUMNS.iter().filter(|def| def.primary_key || def.unique) {
        let Some(value) = column_value(row, def.name).filter(|v| !v.is_null()) else {
            continue;
        };
        let clash = rows
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != skip)
            .any(|(_, other)| column_value(other, def.name) == Some(value));
        if clash {
            return Err(MemoryError::Duplicate {
                table: M::TABLE,
                column: def.name,
            });
        }
    }
    Ok(())
}

fn conditions(example: Vec<(&'static str, Value)>, query: &Query) -> Vec<(&'static str, Value)> {
    let mut conditions = example;
    conditions.extend(
        query
            .filters()
            .iter()
            .map(|filter| (filter.column, filter.value.clone())),
    );
    conditions
}

#[async_trait]
impl MappingRuntime for MemoryStore {
    type Error = MemoryError;

    async fn insert<M: Model>(&self, ctx: &Context, model: M) -> Result<M, MemoryError> {
        ctx.check()?;
        let mut tables = self.tables.write().await;
        ctx.check()?;

        let rows = tables.entry(M::TABLE).or_default();
        let row = model.values();
        check_constraints::<M>(rows, &row, None)?;
        let persisted = project::<M>(&row, None)?;
        rows.push(row);
        Ok(persisted)
    }

    async fn find_by_example<M: Model>(
        &self,
        ctx: &Context,
        example: &M,
        query: Query,
    ) -> Result<M, MemoryError> {
        ctx.check()?;
        let tables = self.tables.read().await;
        ctx.check()?;

        let conditions = conditions(example.example(), &query);
        let mut found: Vec<&Row> = tables
            .get(M::TABLE)
            .into_iter()
            .flatten()
            .filter(|row| matches(row, &conditions))
            .collect();

        let ordering = if query.ordering().is_empty() {
            vec![(M::PRIMARY_KEY, Order::Asc)]
        } else {
            query.ordering().to_vec()
        };
        found.sort_by(|a, b| compare(a, b, &ordering));

        match found.first() {
            Some(row) => project::<M>(row, query.columns()),
            None => Err(MemoryError::NotFound { table: M::TABLE }),
        }
    }

    async fn find_all<M: Model>(&self, ctx: &Context, query: Query) -> Result<Vec<M>, MemoryError> {
        ctx.check()?;
        let tables = self.tables.read().await;
        ctx.check()?;

        let conditions = conditions(Vec::new(), &query);
        let mut found: Vec<&Row> = tables
            .get(M::TABLE)
            .into_iter()
            .flatten()
            .filter(|row| matches(row, &conditions))
            .collect();
        if !query.ordering().is_empty() {
            found.sort_by(|a, b| compare(a, b, query.ordering()));
        }

        found
            .into_iter()
            .take(query.row_limit().unwrap_or(usize::MAX))
            .map(|row| project::<M>(row, query.columns()))
            .collect()
    }

    async fn upsert<M: Model>(&self, ctx: &Context, model: &M) -> Result<(), MemoryError> {
        ctx.check()?;
        let mut tables = self.tables.write().await;
        ctx.check()?;

        let rows = tables.entry(M::TABLE).or_default();
        let key = model.primary_key();
        let row = model.values();
        let existing = rows
            .iter()
            .position(|stored| column_value(stored, M::PRIMARY_KEY) == Some(&key));
        check_constraints::<M>(rows, &row, existing)?;

        match existing {
            Some(idx) => rows[idx] = row,
            None => rows.push(row),
        }
        Ok(())
    }

    async fn update_columns<M: Model>(
        &self,
        ctx: &Context,
        target: &M,
        columns: &[&'static str],
        values: &M,
    ) -> Result<(), MemoryError> {
        ctx.check()?;
        let mut tables = self.tables.write().await;
        ctx.check()?;

        if let Some(unknown) = columns
            .iter()
            .find(|column| !M::COLUMNS.iter().any(|def| def.name == **column))
        {
            return Err(MemoryError::UnknownColumn {
                table: M::TABLE,
                column: unknown.to_string(),
            });
        }

        let rows = tables.entry(M::TABLE).or_default();
        let key = target.primary_key();
        let Some(idx) = rows
            .iter()
            .position(|stored| column_value(stored, M::PRIMARY_KEY) == Some(&key))
        else {
            return Ok(());
        };

        let mut updated = rows[idx].clone();
        for (column, value) in values.values() {
            if !columns.contains(&column) {
                continue;
            }
            if let Some(slot) = updated.iter_mut().find(|(name, _)| *name == column) {
                slot.1 = value;
            }
        }
        check_constraints::<M>(rows, &updated, Some(idx))?;
        rows[idx] = updated;
        Ok(())
    }

    async fn delete_by_example<M: Model>(&self, ctx: &Context, example: &M) -> Result<(), MemoryError> {
        ctx.check()?;
        let mut tables = self.tables.write().await;
        ctx.check()?;

        let conditions = example.example();
        if conditions.is_empty() {
            return Err(MemoryError::MissingWhereClause { table: M::TABLE });
        }
        if let Some(rows) = tables.get_mut(M::TABLE) {
            rows.retain(|row| !matches(row, &conditions));
        }
        Ok(())
    }
}
