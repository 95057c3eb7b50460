//! Rust printer for file plans
//!
//! Generated files are meant to be `include!`d next to the prost output for
//! the same proto file, so records are addressed by their bare struct names.

use super::column::ColumnPlan;
use super::plan::{
    CrudPlan, FilePlan, ModelPlan, Operation, OperationKind, OptionKind, Returns, Step, Unset,
};
use super::GenContext;
use crate::types::{is_rust_keyword, ZeroValue};
use crate::GeneratorError;
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

/// Header written above every generated file
pub fn header(source: &str) -> String {
    format!(
        "// @generated by protoc-gen-crud. DO NOT EDIT.\n// source: {}\n\n",
        source
    )
}

/// Render a file plan into formatted Rust source
pub fn render(cx: &GenContext, plan: &FilePlan) -> Result<String, GeneratorError> {
    let mut items = Vec::with_capacity(plan.models.len());
    for model in &plan.models {
        items.push(render_model(cx, model)?);
    }

    let tokens = quote! { #(#items)* };
    let file: syn::File = syn::parse2(tokens)
        .map_err(|e| GeneratorError::CodeGenError(format!("{}: {}", plan.source, e)))?;

    Ok(format!("{}{}", header(&plan.source), prettyplease::unparse(&file)))
}

/// Identifier of a struct field as prost spells it
pub fn field_ident(name: &str) -> Ident {
    match name {
        // Not valid as raw identifiers; prost appends an underscore
        "self" | "super" | "crate" | "Self" => format_ident!("{}_", name),
        _ if is_rust_keyword(name) => Ident::new_raw(name, Span::call_site()),
        _ => Ident::new(name, Span::call_site()),
    }
}

fn type_tokens(column: &ColumnPlan) -> Result<syn::Type, GeneratorError> {
    syn::parse_str::<syn::Type>(&column.rust_type).map_err(|e| {
        GeneratorError::CodeGenError(format!(
            "invalid type `{}` for field {}: {}",
            column.rust_type, column.path, e
        ))
    })
}

/// `self.<field>` read as an owned value
fn owned(receiver: &TokenStream, column: &ColumnPlan) -> TokenStream {
    let field = field_ident(&column.field);
    if column.copy {
        quote! { #receiver.#field }
    } else {
        quote! { #receiver.#field.clone() }
    }
}

fn render_model(cx: &GenContext, model: &ModelPlan) -> Result<TokenStream, GeneratorError> {
    let rt = cx.runtime();
    let record = format_ident!("{}", model.record);
    let model_ident = format_ident!("{}", model.model);

    let mut fields = Vec::with_capacity(model.columns.len());
    for column in &model.columns {
        let name = field_ident(&column.field);
        let ty = type_tokens(column)?;
        let doc = format!(" Column `{}`", column.column);
        fields.push(quote! {
            #[doc = #doc]
            pub #name: #ty
        });
    }

    let struct_doc = format!(" Mapped form of [`{}`], stored in `{}`", model.record, model.table);
    let paths = model.columns.iter().map(|c| c.path.as_str());

    let record_recv = quote!(self);
    let to_model = model.columns.iter().map(|c| {
        let name = field_ident(&c.field);
        let value = owned(&record_recv, c);
        quote! { #name: #value }
    });
    let to_record = to_model.clone();

    let model_impl = model
        .key_column()
        .map(|key| render_model_impl(cx, model, key));

    let crud = model
        .crud
        .as_ref()
        .map(|crud| render_crud(cx, model, crud))
        .transpose()?;

    Ok(quote! {
        #[doc = #struct_doc]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #model_ident {
            #(#fields,)*
        }

        impl #rt::Schema for #record {
            const FIELD_PATHS: &'static [&'static str] = &[#(#paths),*];
        }

        impl #record {
            /// Convert to the mapped form
            pub fn as_model(&self) -> Result<#model_ident, #rt::ConvertError> {
                Ok(#model_ident {
                    #(#to_model,)*
                })
            }
        }

        impl #model_ident {
            /// Convert back to the protobuf record
            pub fn as_record(&self) -> Result<#record, #rt::ConvertError> {
                Ok(#record {
                    #(#to_record,)*
                })
            }
        }

        #model_impl

        #crud
    })
}

fn render_model_impl(cx: &GenContext, model: &ModelPlan, key: &ColumnPlan) -> TokenStream {
    let rt = cx.runtime();
    let model_ident = format_ident!("{}", model.model);
    let table = &model.table;
    let key_column = &key.column;
    let recv = quote!(self);

    let defs = model.columns.iter().map(|c| {
        let name = &c.column;
        let primary_key = c.attributes.primary_key;
        let unique = c.attributes.unique;
        let not_null = c.attributes.not_null;
        quote! {
            #rt::ColumnDef {
                name: #name,
                primary_key: #primary_key,
                unique: #unique,
                not_null: #not_null,
            }
        }
    });

    let values = model.columns.iter().map(|c| {
        let name = &c.column;
        let value = owned(&recv, c);
        quote! { (#name, #rt::Value::from(#value)) }
    });

    let example = model.columns.iter().map(|c| {
        let name = &c.column;
        let field = field_ident(&c.field);
        if c.optional {
            return quote! {
                if let Some(value) = &self.#field {
                    example.push((#name, #rt::Value::from(value.clone())));
                }
            };
        }
        let value = owned(&recv, c);
        let is_set = match c.zero {
            ZeroValue::Integer => quote! { self.#field != 0 },
            ZeroValue::Float => quote! { self.#field != 0.0 },
            ZeroValue::Bool => quote! { self.#field },
            ZeroValue::String | ZeroValue::Bytes => quote! { !self.#field.is_empty() },
        };
        quote! {
            if #is_set {
                example.push((#name, #rt::Value::from(#value)));
            }
        }
    });

    let setters = model.columns.iter().map(|c| {
        let name = &c.column;
        let field = field_ident(&c.field);
        quote! {
            #name => {
                self.#field = #rt::FromValue::from_value(value)?;
            }
        }
    });

    quote! {
        impl #rt::Model for #model_ident {
            const TABLE: &'static str = #table;
            const COLUMNS: &'static [#rt::ColumnDef] = &[#(#defs),*];
            const PRIMARY_KEY: &'static str = #key_column;

            fn values(&self) -> Vec<(&'static str, #rt::Value)> {
                vec![#(#values),*]
            }

            fn example(&self) -> Vec<(&'static str, #rt::Value)> {
                let mut example = Vec::new();
                #(#example)*
                example
            }

            fn set(&mut self, column: &str, value: #rt::Value) -> Result<(), #rt::ConvertError> {
                match column {
                    #(#setters)*
                    _ => return Err(#rt::ConvertError::UnknownColumn(column.to_string())),
                }
                Ok(())
            }
        }
    }
}

struct CrudNames<'a> {
    rt: &'a syn::Path,
    record: Ident,
    model: Ident,
    get_alias: Ident,
    list_alias: Ident,
}

fn alias_ident(crud: &CrudPlan, kind: OptionKind) -> Result<Ident, GeneratorError> {
    crud.alias(kind)
        .map(|name| format_ident!("{}", name))
        .ok_or_else(|| GeneratorError::CodeGenError(format!("{} has no {:?} option alias", crud.binding, kind)))
}

fn render_crud(
    cx: &GenContext,
    model: &ModelPlan,
    crud: &CrudPlan,
) -> Result<TokenStream, GeneratorError> {
    let rt = cx.runtime();
    let names = CrudNames {
        rt,
        record: format_ident!("{}", model.record),
        model: format_ident!("{}", model.model),
        get_alias: alias_ident(crud, OptionKind::Get)?,
        list_alias: alias_ident(crud, OptionKind::List)?,
    };
    let record = &names.record;
    let binding = format_ident!("{}", crud.binding);

    let aliases = crud.aliases.iter().map(|alias| {
        let name = format_ident!("{}", alias.name);
        let doc = match alias.kind {
            OptionKind::Get => format!(" Option accepted by [`{}::get`]", crud.binding),
            OptionKind::List => format!(" Option accepted by [`{}::list`]", crud.binding),
            OptionKind::Patch => format!(" Option reserved for [`{}::patch`]", crud.binding),
        };
        quote! {
            #[doc = #doc]
            pub type #name = #rt::QueryOption;
        }
    });

    let arms = model.columns.iter().map(|c| {
        let path = &c.path;
        let column = &c.column;
        quote! { #path => Some(#column), }
    });

    let operations = crud
        .operations
        .iter()
        .map(|op| render_operation(&names, model, crud, op))
        .collect::<Result<Vec<_>, _>>()?;

    let binding_doc = format!(" [`{}`] bound to a mapping runtime", model.record);

    Ok(quote! {
        #(#aliases)*

        #[doc = #binding_doc]
        pub struct #binding<'a, S> {
            record: Option<&'a #record>,
            db: &'a S,
        }

        impl #record {
            /// Bind this record to a mapping runtime
            pub fn with_db<'a, S: #rt::MappingRuntime>(&'a self, db: &'a S) -> #binding<'a, S> {
                #binding::new(Some(self), db)
            }

            /// Column stored for a field-mask path
            pub fn column(path: &str) -> Option<&'static str> {
                match path {
                    #(#arms)*
                    _ => None,
                }
            }
        }

        impl<'a, S: #rt::MappingRuntime> #binding<'a, S> {
            /// Bind an optional record; operations on `None` succeed without
            /// touching the store
            pub fn new(record: Option<&'a #record>, db: &'a S) -> Self {
                Self { record, db }
            }

            fn columns(paths: &[String]) -> Result<Vec<&'static str>, #rt::CrudError<S::Error>> {
                paths
                    .iter()
                    .map(|path| {
                        #record::column(path)
                            .ok_or_else(|| #rt::CrudError::invalid_argument("invalid field mask"))
                    })
                    .collect()
            }

            #(#operations)*
        }
    })
}

fn render_operation(
    names: &CrudNames<'_>,
    model: &ModelPlan,
    crud: &CrudPlan,
    op: &Operation,
) -> Result<TokenStream, GeneratorError> {
    let rt = names.rt;
    let record = &names.record;
    let method = format_ident!("{}", op.kind.method_name());
    let error = quote! { #rt::CrudError<S::Error> };

    let ok = match op.kind.returns() {
        Returns::Record => quote! { Option<#record> },
        Returns::Records => quote! { Vec<#record> },
        Returns::Nothing => quote! { () },
        Returns::GetOption => {
            let alias = &names.get_alias;
            quote! { #alias }
        }
    };

    let body = op
        .steps
        .iter()
        .map(|step| render_step(names, model, crud, op, *step))
        .collect::<Result<Vec<_>, _>>()?;

    let get_alias = &names.get_alias;
    let list_alias = &names.list_alias;
    let doc = match op.kind {
        OperationKind::Create => " Insert the record and return its persisted form",
        OperationKind::Get => " Fetch the stored record matching every populated field",
        OperationKind::List => " Fetch every stored record",
        OperationKind::Update => " Insert or replace the record, then fetch it back",
        OperationKind::Patch => " Update only the columns named by `mask`",
        OperationKind::Delete => " Delete stored records matching every populated field",
        OperationKind::WithGetFieldMask => " Get option selecting only the columns named by `mask`",
    };

    Ok(match op.kind {
        OperationKind::Create | OperationKind::Update | OperationKind::Delete => quote! {
            #[doc = #doc]
            pub async fn #method(&self, ctx: &#rt::Context) -> Result<#ok, #error> {
                #(#body)*
            }
        },
        OperationKind::Get => quote! {
            #[doc = #doc]
            pub async fn #method(&self, ctx: &#rt::Context, opts: Vec<#get_alias>) -> Result<#ok, #error> {
                #(#body)*
            }
        },
        OperationKind::List => quote! {
            #[doc = #doc]
            pub async fn #method(&self, ctx: &#rt::Context, opts: Vec<#list_alias>) -> Result<#ok, #error> {
                #(#body)*
            }
        },
        OperationKind::Patch => quote! {
            #[doc = #doc]
            ///
            /// A missing or empty mask performs a full update.
            pub async fn #method(&self, ctx: &#rt::Context, mask: Option<&#rt::FieldMask>) -> Result<#ok, #error> {
                #(#body)*
            }
        },
        OperationKind::WithGetFieldMask => quote! {
            #[doc = #doc]
            pub fn #method(&self, mask: &#rt::FieldMask) -> Result<#ok, #error> {
                #(#body)*
            }
        },
    })
}

fn store_call(rt: &syn::Path, call: TokenStream) -> TokenStream {
    quote! { #call.await.map_err(#rt::CrudError::Store)? }
}

fn render_step(
    names: &CrudNames<'_>,
    model: &ModelPlan,
    crud: &CrudPlan,
    op: &Operation,
    step: Step,
) -> Result<TokenStream, GeneratorError> {
    let rt = names.rt;
    let record = &names.record;
    let model_ident = &names.model;

    Ok(match step {
        Step::ReturnIfAbsent => {
            let absent = match op.kind.returns() {
                Returns::Record => quote! { None },
                Returns::Records => quote! { Vec::new() },
                Returns::Nothing => quote! { () },
                Returns::GetOption => {
                    return Err(GeneratorError::CodeGenError(format!(
                        "{} cannot return early without a record",
                        op.kind.method_name()
                    )))
                }
            };
            if op.uses_record() {
                quote! {
                    let Some(record) = self.record else {
                        return Ok(#absent);
                    };
                }
            } else {
                quote! {
                    if self.record.is_none() {
                        return Ok(#absent);
                    }
                }
            }
        }
        Step::UpdateIfMaskAbsent => quote! {
            let Some(mask) = mask else {
                return self.update(ctx).await.map(|_| ());
            };
        },
        Step::ValidateMask => quote! {
            if !#rt::FieldMaskExt::is_valid_for::<#record>(mask) {
                return Err(#rt::CrudError::invalid_argument("invalid field mask"));
            }
        },
        Step::UpdateIfMaskEmpty => quote! {
            if #rt::FieldMaskExt::mask_paths(mask).is_empty() {
                return self.update(ctx).await.map(|_| ());
            }
        },
        Step::CheckPrimaryKey => {
            let field = field_ident(&crud.key.field);
            let unset = match crud.key.unset {
                Unset::Nil => quote! { record.#field.is_none() },
                Unset::Zero(ZeroValue::Integer) => quote! { record.#field == 0 },
                Unset::Zero(ZeroValue::Float) => quote! { record.#field == 0.0 },
                Unset::Zero(ZeroValue::Bool) => quote! { !record.#field },
                Unset::Zero(ZeroValue::String | ZeroValue::Bytes) => {
                    quote! { record.#field.is_empty() }
                }
            };
            let message = crud.key.unset.message();
            quote! {
                if #unset {
                    return Err(#rt::CrudError::invalid_argument(#message));
                }
            }
        }
        Step::ToModel => quote! { let model = record.as_model()?; },
        Step::BuildQuery => quote! { let query = #rt::apply_options(opts); },
        Step::Insert => {
            let call = store_call(rt, quote! { self.db.insert(ctx, model) });
            quote! { let model = #call; }
        }
        Step::FindByExample => {
            let call = store_call(rt, quote! { self.db.find_by_example(ctx, &model, query) });
            quote! { let model = #call; }
        }
        Step::FindAll => {
            let call = store_call(rt, quote! { self.db.find_all(ctx, query) });
            quote! { let models: Vec<#model_ident> = #call; }
        }
        Step::Upsert => {
            let call = store_call(rt, quote! { self.db.upsert(ctx, &model) });
            quote! { #call; }
        }
        Step::RefetchWithGet => quote! { self.get(ctx, Vec::new()).await },
        Step::TargetPrimaryKey => {
            let key = model.key_column().ok_or_else(|| {
                GeneratorError::CodeGenError(format!("{} has no primary key", model.record))
            })?;
            let field = field_ident(&key.field);
            let value = owned(&quote!(model), key);
            if model.columns.len() > 1 {
                quote! {
                    let target = #model_ident {
                        #field: #value,
                        ..Default::default()
                    };
                }
            } else {
                quote! { let target = #model_ident { #field: #value }; }
            }
        }
        Step::ResolveMaskColumns => quote! {
            let columns = Self::columns(#rt::FieldMaskExt::mask_paths(mask))?;
        },
        Step::UpdateColumns => {
            let call = store_call(
                rt,
                quote! { self.db.update_columns(ctx, &target, &columns, &model) },
            );
            quote! { #call; }
        }
        Step::DeleteByExample => {
            let call = store_call(rt, quote! { self.db.delete_by_example(ctx, &model) });
            quote! { #call; }
        }
        Step::ReturnRecord => quote! { Ok(Some(model.as_record()?)) },
        Step::ReturnRecords => quote! {
            models
                .iter()
                .map(|model| model.as_record().map_err(#rt::CrudError::from))
                .collect()
        },
        Step::ReturnNothing => quote! { Ok(()) },
        Step::ReturnSelectOption => {
            let alias = &names.get_alias;
            quote! {
                let option: #alias = Box::new(move |query: #rt::Query| query.select(columns));
                Ok(option)
            }
        }
    })
}
