use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A calculation row. The client-defined fields live in `data` as a JSON object.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "calculations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub data: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn create(db: &DatabaseConnection, data: Json) -> Result<Model, ModelError> {
    if !data.is_object() {
        return Err(ModelError::Validation("calculation data must be a JSON object".into()));
    }
    let am = ActiveModel { data: Set(data), ..Default::default() };
    Ok(am.insert(db).await?)
}

/// Replace `data` in a single statement; `None` when no row has `id`.
pub async fn update(db: &DatabaseConnection, id: i64, data: Json) -> Result<Option<Model>, ModelError> {
    if !data.is_object() {
        return Err(ModelError::Validation("calculation data must be a JSON object".into()));
    }
    let res = Entity::update_many()
        .col_expr(Column::Data, Expr::value(data.clone()))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Ok(None);
    }
    Ok(Some(Model { id, data }))
}

/// Delete by id; returns whether a row was removed.
pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
