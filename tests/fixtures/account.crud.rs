// @generated by protoc-gen-crud. DO NOT EDIT.
// source: test/account.proto

/// Mapped form of [`Account`], stored in `account`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountModel {
    /// Column `id`
    pub id: Option<i64>,
    /// Column `active`
    pub active: bool,
    /// Column `balance`
    pub balance: f64,
    /// Column `avatar`
    pub avatar: Vec<u8>,
    /// Column `status`
    pub status: i32,
    /// Column `note`
    pub note: Option<String>,
}
impl ::protoc_gen_crud::runtime::Schema for Account {
    const FIELD_PATHS: &'static [&'static str] = &[
        "id",
        "active",
        "balance",
        "avatar",
        "status",
        "note",
    ];
}
impl Account {
    /// Convert to the mapped form
    pub fn as_model(&self) -> Result<AccountModel, ::protoc_gen_crud::runtime::ConvertError> {
        Ok(AccountModel {
            id: self.id,
            active: self.active,
            balance: self.balance,
            avatar: self.avatar.clone(),
            status: self.status,
            note: self.note.clone(),
        })
    }
}
impl AccountModel {
    /// Convert back to the protobuf record
    pub fn as_record(&self) -> Result<Account, ::protoc_gen_crud::runtime::ConvertError> {
        Ok(Account {
            id: self.id,
            active: self.active,
            balance: self.balance,
            avatar: self.avatar.clone(),
            status: self.status,
            note: self.note.clone(),
        })
    }
}
impl ::protoc_gen_crud::runtime::Model for AccountModel {
    const TABLE: &'static str = "account";
    const COLUMNS: &'static [::protoc_gen_crud::runtime::ColumnDef] = &[
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "id",
            primary_key: true,
            unique: false,
            not_null: true,
        },
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "active",
            primary_key: false,
            unique: false,
            not_null: false,
        },
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "balance",
            primary_key: false,
            unique: false,
            not_null: false,
        },
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "avatar",
            primary_key: false,
            unique: false,
            not_null: false,
        },
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "status",
            primary_key: false,
            unique: false,
            not_null: false,
        },
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "note",
            primary_key: false,
            unique: false,
            not_null: false,
        },
    ];
    const PRIMARY_KEY: &'static str = "id";
    fn values(&self) -> Vec<(&'static str, ::protoc_gen_crud::runtime::Value)> {
        vec![
            ("id", ::protoc_gen_crud::runtime::Value::from(self.id)),
            ("active", ::protoc_gen_crud::runtime::Value::from(self.active)),
            ("balance", ::protoc_gen_crud::runtime::Value::from(self.balance)),
            ("avatar", ::protoc_gen_crud::runtime::Value::from(self.avatar.clone())),
            ("status", ::protoc_gen_crud::runtime::Value::from(self.status)),
            ("note", ::protoc_gen_crud::runtime::Value::from(self.note.clone()))
        ]
    }
    fn example(&self) -> Vec<(&'static str, ::protoc_gen_crud::runtime::Value)> {
        let mut example = Vec::new();
        if let Some(value) = &self.id {
            example.push(("id", ::protoc_gen_crud::runtime::Value::from(value.clone())));
        }
        if self.active {
            example.push(("active", ::protoc_gen_crud::runtime::Value::from(self.active)));
        }
        if self.balance != 0.0 {
            example.push(("balance", ::protoc_gen_crud::runtime::Value::from(self.balance)));
        }
        if !self.avatar.is_empty() {
            example
                .push((
                    "avatar",
                    ::protoc_gen_crud::runtime::Value::from(self.avatar.clone()),
                ));
        }
        if self.status != 0 {
            example.push(("status", ::protoc_gen_crud::runtime::Value::from(self.status)));
        }
        if let Some(value) = &self.note {
            example.push(("note", ::protoc_gen_crud::runtime::Value::from(value.clone())));
        }
        example
    }
    fn set(
        &mut self,
        column: &str,
        value: ::protoc_gen_crud::runtime::Value,
    ) -> Result<(), ::protoc_gen_crud::runtime::ConvertError> {
        match column {
            "id" => {
                self.id = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            "active" => {
                self.active = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            "balance" => {
                self.balance = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            "avatar" => {
                self.avatar = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            "status" => {
                self.status = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            "note" => {
                self.note = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            _ => return Err(::protoc_gen_crud::runtime::ConvertError::UnknownColumn(column.to_string())),
        }
        Ok(())
    }
}
/// Option accepted by [`AccountWithDb::get`]
pub type AccountGetOption = ::protoc_gen_crud::runtime::QueryOption;
/// Option accepted by [`AccountWithDb::list`]
pub type AccountListOption = ::protoc_gen_crud::runtime::QueryOption;
/// Option reserved for [`AccountWithDb::patch`]
pub type AccountPatchOption = ::protoc_gen_crud::runtime::QueryOption;
/// [`Account`] bound to a mapping runtime
pub struct AccountWithDb<'a, S> {
    record: Option<&'a Account>,
    db: &'a S,
}
impl Account {
    /// Bind this record to a mapping runtime
    pub fn with_db<'a, S: ::protoc_gen_crud::runtime::MappingRuntime>(
        &'a self,
        db: &'a S,
    ) -> AccountWithDb<'a, S> {
        AccountWithDb::new(Some(self), db)
    }
    /// Column stored for a field-mask path
    pub fn column(path: &str) -> Option<&'static str> {
        match path {
            "id" => Some("id"),
            "active" => Some("active"),
            "balance" => Some("balance"),
            "avatar" => Some("avatar"),
            "status" => Some("status"),
            "note" => Some("note"),
            _ => None,
        }
    }
}
impl<'a, S: ::protoc_gen_crud::runtime::MappingRuntime> AccountWithDb<'a, S> {
    /// Bind an optional record; operations on `None` succeed without
    /// touching the store
    pub fn new(record: Option<&'a Account>, db: &'a S) -> Self {
        Self { record, db }
    }
    fn columns(
        paths: &[String],
    ) -> Result<Vec<&'static str>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        paths
            .iter()
            .map(|path| {
                Account::column(path)
                    .ok_or_else(|| ::protoc_gen_crud::runtime::CrudError::invalid_argument(
                        "invalid field mask",
                    ))
            })
            .collect()
    }
    /// Insert the record and return its persisted form
    pub async fn create(
        &self,
        ctx: &::protoc_gen_crud::runtime::Context,
    ) -> Result<Option<Account>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        let Some(record) = self.record else {
            return Ok(None);
        };
        let model = record.as_model()?;
        let model = self
            .db
            .insert(ctx, model)
            .await
            .map_err(::protoc_gen_crud::runtime::CrudError::Store)?;
        Ok(Some(model.as_record()?))
    }
    /// Fetch the stored record matching every populated field
    pub async fn get(
        &self,
        ctx: &::protoc_gen_crud::runtime::Context,
        opts: Vec<AccountGetOption>,
    ) -> Result<Option<Account>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        let Some(record) = self.record else {
            return Ok(None);
        };
        if record.id.is_none() {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("nil primary key"),
            );
        }
        let model = record.as_model()?;
        let query = ::protoc_gen_crud::runtime::apply_options(opts);
        let model = self
            .db
            .find_by_example(ctx, &model, query)
            .await
            .map_err(::protoc_gen_crud::runtime::CrudError::Store)?;
        Ok(Some(model.as_record()?))
    }
    /// Fetch every stored record
    pub async fn list(
        &self,
        ctx: &::protoc_gen_crud::runtime::Context,
        opts: Vec<AccountListOption>,
    ) -> Result<Vec<Account>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        if self.record.is_none() {
            return Ok(Vec::new());
        }
        let query = ::protoc_gen_crud::runtime::apply_options(opts);
        let models: Vec<AccountModel> = self
            .db
            .find_all(ctx, query)
            .await
            .map_err(::protoc_gen_crud::runtime::CrudError::Store)?;
        models
            .iter()
            .map(|model| model.as_record().map_err(::protoc_gen_crud::runtime::CrudError::from))
            .collect()
    }
    /// Insert or replace the record, then fetch it back
    pub async fn update(
        &self,
        ctx: &::protoc_gen_crud::runtime::Context,
    ) -> Result<Option<Account>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        let Some(record) = self.record else {
            return Ok(None);
        };
        if record.id.is_none() {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("nil primary key"),
            );
        }
        let model = record.as_model()?;
        self.db
            .upsert(ctx, &model)
            .await
            .map_err(::protoc_gen_crud::runtime::CrudError::Store)?;
        self.get(ctx, Vec::new()).await
    }
    /// Update only the columns named by `mask`
    ///
    /// A missing or empty mask performs a full update.
    pub async fn patch(
        &self,
        ctx: &::protoc_gen_crud::runtime::Context,
        mask: Option<&::protoc_gen_crud::runtime::FieldMask>,
    ) -> Result<(), ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        let Some(record) = self.record else {
            return Ok(());
        };
        let Some(mask) = mask else {
            return self.update(ctx).await.map(|_| ());
        };
        if !::protoc_gen_crud::runtime::FieldMaskExt::is_valid_for::<Account>(mask) {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("invalid field mask"),
            );
        }
        if ::protoc_gen_crud::runtime::FieldMaskExt::mask_paths(mask).is_empty() {
            return self.update(ctx).await.map(|_| ());
        }
        if record.id.is_none() {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("nil primary key"),
            );
        }
        let model = record.as_model()?;
        let target = AccountModel {
            id: model.id,
            ..Default::default()
        };
        let columns = Self::columns(
            ::protoc_gen_crud::runtime::FieldMaskExt::mask_paths(mask),
        )?;
        self.db
            .update_columns(ctx, &target, &columns, &model)
            .await
            .map_err(::protoc_gen_crud::runtime::CrudError::Store)?;
        Ok(())
    }
    /// Delete stored records matching every populated field
    pub async fn delete(
        &self,
        ctx: &::protoc_gen_crud::runtime::Context,
    ) -> Result<(), ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        let Some(record) = self.record else {
            return Ok(());
        };
        if record.id.is_none() {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("nil primary key"),
            );
        }
        let model = record.as_model()?;
        self.db
            .delete_by_example(ctx, &model)
            .await
            .map_err(::protoc_gen_crud::runtime::CrudError::Store)?;
        Ok(())
    }
    /// Get option selecting only the columns named by `mask`
    pub fn with_get_field_mask(
        &self,
        mask: &::protoc_gen_crud::runtime::FieldMask,
    ) -> Result<AccountGetOption, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        let columns = Self::columns(
            ::protoc_gen_crud::runtime::FieldMaskExt::mask_paths(mask),
        )?;
        let option: AccountGetOption =
            Box::new(move |query: ::protoc_gen_crud::runtime::Query| query.select(columns));
        Ok(option)
    }
}
