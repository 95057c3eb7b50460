//! Declarative plan of the code emitted for one proto file
//!
//! The plan says *what* each generated item does, as an ordered list of
//! steps per operation. Printers (see [`super::rust`]) decide how a step is
//! spelled in a target language.

use super::column::{plan_column, ColumnPlan};
use crate::schema::Message;
use crate::translate::TranslateError;
use crate::types::ZeroValue;

/// Everything emitted for one proto file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    /// Proto file the plan was built from
    pub source: String,
    /// One entry per mapped message, in declaration order
    pub models: Vec<ModelPlan>,
}

/// The mapped model of one message, plus its CRUD layer if enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPlan {
    /// Record (prost struct) name
    pub record: String,
    /// Mapped model struct name
    pub model: String,
    /// Table name
    pub table: String,
    /// Columns in declaration order
    pub columns: Vec<ColumnPlan>,
    /// Index of the primary-key column
    pub primary_key: Option<usize>,
    /// CRUD layer, for `crud` messages
    pub crud: Option<CrudPlan>,
}

impl ModelPlan {
    /// The primary-key column
    pub fn key_column(&self) -> Option<&ColumnPlan> {
        self.primary_key.map(|idx| &self.columns[idx])
    }
}

/// Which option alias a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Options accepted by `get`
    Get,
    /// Options accepted by `list`
    List,
    /// Reserved for `patch`
    Patch,
}

/// A named option-function type alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionAlias {
    /// Which operation it belongs to
    pub kind: OptionKind,
    /// Alias name
    pub name: String,
}

/// How an unset primary key is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unset {
    /// `Option` key that is `None`
    Nil,
    /// Value key equal to its zero value
    Zero(ZeroValue),
}

impl Unset {
    /// InvalidArgument message reported for an unset key
    pub fn message(self) -> &'static str {
        match self {
            Unset::Nil => "nil primary key",
            Unset::Zero(_) => "empty primary key",
        }
    }
}

/// Primary-key precondition of every keyed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCheck {
    /// Record field holding the key
    pub field: String,
    /// How "unset" is detected
    pub unset: Unset,
}

/// The generated operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Insert and return the persisted record
    Create,
    /// Fetch one record by example
    Get,
    /// Fetch all records
    List,
    /// Full upsert, then re-fetch
    Update,
    /// Column-scoped update by field mask
    Patch,
    /// Delete by example
    Delete,
    /// Build a get option selecting the mask's columns
    WithGetFieldMask,
}

impl OperationKind {
    /// Every operation in emission order
    pub const ALL: [OperationKind; 7] = [
        OperationKind::Create,
        OperationKind::Get,
        OperationKind::List,
        OperationKind::Update,
        OperationKind::Patch,
        OperationKind::Delete,
        OperationKind::WithGetFieldMask,
    ];

    /// Method name on the binding type
    pub fn method_name(self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Get => "get",
            OperationKind::List => "list",
            OperationKind::Update => "update",
            OperationKind::Patch => "patch",
            OperationKind::Delete => "delete",
            OperationKind::WithGetFieldMask => "with_get_field_mask",
        }
    }

    /// What the operation hands back on success
    pub fn returns(self) -> Returns {
        match self {
            OperationKind::Create | OperationKind::Get | OperationKind::Update => Returns::Record,
            OperationKind::List => Returns::Records,
            OperationKind::Patch | OperationKind::Delete => Returns::Nothing,
            OperationKind::WithGetFieldMask => Returns::GetOption,
        }
    }
}

/// Success value of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
    /// `Option<Record>`, `None` when the binding holds no record
    Record,
    /// `Vec<Record>`
    Records,
    /// `()`
    Nothing,
    /// A get option
    GetOption,
}

/// A single step of an operation body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Succeed with the empty result if the binding holds no record
    ReturnIfAbsent,
    /// Delegate to `update` when no mask was given
    UpdateIfMaskAbsent,
    /// Fail with "invalid field mask" unless every path names a field
    ValidateMask,
    /// Delegate to `update` when the mask has no paths
    UpdateIfMaskEmpty,
    /// Fail with "nil primary key" / "empty primary key" if the key is unset
    CheckPrimaryKey,
    /// Convert the record to its mapped form
    ToModel,
    /// Fold the caller's options over a fresh query
    BuildQuery,
    /// Insert the mapped form
    Insert,
    /// Fetch one row by example
    FindByExample,
    /// Fetch every row accepted by the query
    FindAll,
    /// Insert or replace the row
    Upsert,
    /// Return the result of `get` without options
    RefetchWithGet,
    /// Build the update target holding only the primary key
    TargetPrimaryKey,
    /// Translate the mask's paths to columns
    ResolveMaskColumns,
    /// Update exactly the resolved columns of the target row
    UpdateColumns,
    /// Delete rows by example
    DeleteByExample,
    /// Convert the fetched or persisted row back and return it
    ReturnRecord,
    /// Convert every fetched row back and return them
    ReturnRecords,
    /// Return success
    ReturnNothing,
    /// Return an option selecting the resolved columns
    ReturnSelectOption,
}

/// One generated operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Which operation
    pub kind: OperationKind,
    /// Body, in order
    pub steps: Vec<Step>,
}

impl Operation {
    /// Whether the body reads the bound record
    pub fn uses_record(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, Step::ToModel | Step::CheckPrimaryKey | Step::ValidateMask))
    }
}

/// The CRUD layer of one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrudPlan {
    /// Binding type name
    pub binding: String,
    /// Get, List and Patch option aliases
    pub aliases: Vec<OptionAlias>,
    /// Primary-key precondition
    pub key: KeyCheck,
    /// Operations in emission order
    pub operations: Vec<Operation>,
}

impl CrudPlan {
    /// Name of an option alias
    pub fn alias(&self, kind: OptionKind) -> Option<&str> {
        self.aliases
            .iter()
            .find(|a| a.kind == kind)
            .map(|a| a.name.as_str())
    }
}

/// Steps of each operation
pub fn steps(kind: OperationKind) -> Vec<Step> {
    use Step::*;
    match kind {
        OperationKind::Create => vec![ReturnIfAbsent, ToModel, Insert, ReturnRecord],
        OperationKind::Get => vec![
            ReturnIfAbsent,
            CheckPrimaryKey,
            ToModel,
            BuildQuery,
            FindByExample,
            ReturnRecord,
        ],
        OperationKind::List => vec![ReturnIfAbsent, BuildQuery, FindAll, ReturnRecords],
        OperationKind::Update => vec![
            ReturnIfAbsent,
            CheckPrimaryKey,
            ToModel,
            Upsert,
            RefetchWithGet,
        ],
        OperationKind::Patch => vec![
            ReturnIfAbsent,
            UpdateIfMaskAbsent,
            ValidateMask,
            UpdateIfMaskEmpty,
            CheckPrimaryKey,
            ToModel,
            TargetPrimaryKey,
            ResolveMaskColumns,
            UpdateColumns,
            ReturnNothing,
        ],
        OperationKind::Delete => vec![
            ReturnIfAbsent,
            CheckPrimaryKey,
            ToModel,
            DeleteByExample,
            ReturnNothing,
        ],
        OperationKind::WithGetFieldMask => vec![ResolveMaskColumns, ReturnSelectOption],
    }
}

/// Plan every mapped message of a file
pub fn plan_file(source: &str, messages: &[Message]) -> Result<FilePlan, TranslateError> {
    let models = messages
        .iter()
        .map(plan_model)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FilePlan {
        source: source.to_string(),
        models,
    })
}

/// Plan the model and CRUD layer of one message
pub fn plan_model(message: &Message) -> Result<ModelPlan, TranslateError> {
    let columns = message
        .fields
        .iter()
        .map(|field| plan_column(message, field))
        .collect::<Result<Vec<_>, _>>()?;

    let primary_key = message
        .primary_key()
        .and_then(|pk| columns.iter().position(|c| c.path == pk.name));

    let crud = match (message.crud, primary_key) {
        (true, Some(idx)) => Some(plan_crud(&message.record_name, &columns[idx])),
        _ => None,
    };

    Ok(ModelPlan {
        record: message.record_name.clone(),
        model: message.model_name.clone(),
        table: message.table.clone(),
        columns,
        primary_key,
        crud,
    })
}

fn plan_crud(record: &str, key: &ColumnPlan) -> CrudPlan {
    let binding = format!("{}WithDb", record);
    let aliases = [
        (OptionKind::Get, "GetOption"),
        (OptionKind::List, "ListOption"),
        (OptionKind::Patch, "PatchOption"),
    ]
    .into_iter()
    .map(|(kind, suffix)| OptionAlias {
        kind,
        name: format!("{}{}", record, suffix),
    })
    .collect();

    let unset = if key.optional {
        Unset::Nil
    } else {
        Unset::Zero(key.zero)
    };

    CrudPlan {
        binding,
        aliases,
        key: KeyCheck {
            field: key.field.clone(),
            unset,
        },
        operations: OperationKind::ALL
            .into_iter()
            .map(|kind| Operation {
                kind,
                steps: steps(kind),
            })
            .collect(),
    }
}
