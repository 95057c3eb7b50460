// @generated by protoc-gen-crud. DO NOT EDIT.
// source: test/user.proto

/// Mapped form of [`User`], stored in `users`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserModel {
    /// Column `name`
    pub name: String,
    /// Column `nick`
    pub display_name: String,
    /// Column `email`
    pub email: String,
    /// Column `age`
    pub age: u32,
}
impl ::protoc_gen_crud::runtime::Schema for User {
    const FIELD_PATHS: &'static [&'static str] = &["name", "display_name", "email", "age"];
}
impl User {
    /// Convert to the mapped form
    pub fn as_model(&self) -> Result<UserModel, ::protoc_gen_crud::runtime::ConvertError> {
        Ok(UserModel {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            age: self.age,
        })
    }
}
impl UserModel {
    /// Convert back to the protobuf record
    pub fn as_record(&self) -> Result<User, ::protoc_gen_crud::runtime::ConvertError> {
        Ok(User {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            age: self.age,
        })
    }
}
impl ::protoc_gen_crud::runtime::Model for UserModel {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [::protoc_gen_crud::runtime::ColumnDef] = &[
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "name",
            primary_key: true,
            unique: false,
            not_null: true,
        },
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "nick",
            primary_key: false,
            unique: false,
            not_null: true,
        },
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "email",
            primary_key: false,
            unique: true,
            not_null: false,
        },
        ::protoc_gen_crud::runtime::ColumnDef {
            name: "age",
            primary_key: false,
            unique: false,
            not_null: false,
        },
    ];
    const PRIMARY_KEY: &'static str = "name";
    fn values(&self) -> Vec<(&'static str, ::protoc_gen_crud::runtime::Value)> {
        vec![
            ("name", ::protoc_gen_crud::runtime::Value::from(self.name.clone())),
            ("nick", ::protoc_gen_crud::runtime::Value::from(self.display_name.clone())),
            ("email", ::protoc_gen_crud::runtime::Value::from(self.email.clone())),
            ("age", ::protoc_gen_crud::runtime::Value::from(self.age))
        ]
    }
    fn example(&self) -> Vec<(&'static str, ::protoc_gen_crud::runtime::Value)> {
        let mut example = Vec::new();
        if !self.name.is_empty() {
            example.push(("name", ::protoc_gen_crud::runtime::Value::from(self.name.clone())));
        }
        if !self.display_name.is_empty() {
            example
                .push((
                    "nick",
                    ::protoc_gen_crud::runtime::Value::from(self.display_name.clone()),
                ));
        }
        if !self.email.is_empty() {
            example.push(("email", ::protoc_gen_crud::runtime::Value::from(self.email.clone())));
        }
        if self.age != 0 {
            example.push(("age", ::protoc_gen_crud::runtime::Value::from(self.age)));
        }
        example
    }
    fn set(
        &mut self,
        column: &str,
        value: ::protoc_gen_crud::runtime::Value,
    ) -> Result<(), ::protoc_gen_crud::runtime::ConvertError> {
        match column {
            "name" => {
                self.name = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            "nick" => {
                self.display_name = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            "email" => {
                self.email = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            "age" => {
                self.age = ::protoc_gen_crud::runtime::FromValue::from_value(value)?;
            }
            _ => return Err(::protoc_gen_crud::runtime::ConvertError::UnknownColumn(column.to_string())),
        }
        Ok(())
    }
}
/// Option accepted by [`UserWithDb::get`]
pub type UserGetOption = ::protoc_gen_crud::runtime::QueryOption;
/// Option accepted by [`UserWithDb::list`]
pub type UserListOption = ::protoc_gen_crud::runtime::QueryOption;
/// Option reserved for [`UserWithDb::patch`]
pub type UserPatchOption = ::protoc_gen_crud::runtime::QueryOption;
/// [`User`] bound to a mapping runtime
pub struct UserWithDb<'a, S> {
    record: Option<&'a User>,
    db: &'a S,
}
impl User {
    /// Bind this record to a mapping runtime
    pub fn with_db<'a, S: ::protoc_gen_crud::runtime::MappingRuntime>(
        &'a self,
        db: &'a S,
    ) -> UserWithDb<'a, S> {
        UserWithDb::new(Some(self), db)
    }
    /// Column stored for a field-mask path
    pub fn column(path: &str) -> Option<&'static str> {
        match path {
            "name" => Some("name"),
            "display_name" => Some("nick"),
            "email" => Some("email"),
            "age" => Some("age"),
            _ => None,
        }
    }
}
impl<'a, S: ::protoc_gen_crud::runtime::MappingRuntime> UserWithDb<'a, S> {
    /// Bind an optional record; operations on `None` succeed without
    /// touching the store
    pub fn new(record: Option<&'a User>, db: &'a S) -> Self {
        Self { record, db }
    }
    fn columns(
        paths: &[String],
    ) -> Result<Vec<&'static str>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        paths
            .iter()
            .map(|path| {
                User::column(path)
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
    ) -> Result<Option<User>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
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
        opts: Vec<UserGetOption>,
    ) -> Result<Option<User>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        let Some(record) = self.record else {
            return Ok(None);
        };
        if record.name.is_empty() {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("empty primary key"),
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
        opts: Vec<UserListOption>,
    ) -> Result<Vec<User>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        if self.record.is_none() {
            return Ok(Vec::new());
        }
        let query = ::protoc_gen_crud::runtime::apply_options(opts);
        let models: Vec<UserModel> = self
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
    ) -> Result<Option<User>, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        let Some(record) = self.record else {
            return Ok(None);
        };
        if record.name.is_empty() {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("empty primary key"),
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
        if !::protoc_gen_crud::runtime::FieldMaskExt::is_valid_for::<User>(mask) {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("invalid field mask"),
            );
        }
        if ::protoc_gen_crud::runtime::FieldMaskExt::mask_paths(mask).is_empty() {
            return self.update(ctx).await.map(|_| ());
        }
        if record.name.is_empty() {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("empty primary key"),
            );
        }
        let model = record.as_model()?;
        let target = UserModel {
            name: model.name.clone(),
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
        if record.name.is_empty() {
            return Err(
                ::protoc_gen_crud::runtime::CrudError::invalid_argument("empty primary key"),
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
    ) -> Result<UserGetOption, ::protoc_gen_crud::runtime::CrudError<S::Error>> {
        let columns = Self::columns(
            ::protoc_gen_crud::runtime::FieldMaskExt::mask_paths(mask),
        )?;
        let option: UserGetOption =
            Box::new(move |query: ::protoc_gen_crud::runtime::Query| query.select(columns));
        Ok(option)
    }
}
