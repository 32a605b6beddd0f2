use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text", unique)]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_password_hash(password_hash: &str) -> Result<(), ModelError> {
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    Ok(())
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

/// Insert a user. A taken email surfaces as `ModelError::UniqueViolation`
/// from the unique index, so there is no separate existence check.
pub async fn create(db: &DatabaseConnection, email: &str, password_hash: &str) -> Result<Model, ModelError> {
    validate_password_hash(password_hash)?;
    let am = ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Replace email and password hash in a single statement; `None` when no row has `id`.
pub async fn update(db: &DatabaseConnection, id: i64, email: &str, password_hash: &str) -> Result<Option<Model>, ModelError> {
    validate_password_hash(password_hash)?;
    let res = Entity::update_many()
        .col_expr(Column::Email, Expr::value(email.to_string()))
        .col_expr(Column::PasswordHash, Expr::value(password_hash.to_string()))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Ok(None);
    }
    Ok(Some(Model { id, email: email.to_string(), password_hash: password_hash.to_string() }))
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
