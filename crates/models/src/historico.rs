use sea_orm::{
    entity::prelude::*, sea_query::Expr, ActiveModelTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "historicos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lingua: String,
    pub data: String,
    pub rank: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// One `GROUP BY lingua` row.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct LinguaCount {
    pub lingua: String,
    pub count: i64,
}

pub async fn create(
    db: &DatabaseConnection,
    lingua: &str,
    data: &str,
    rank: Option<&str>,
) -> Result<Model, ModelError> {
    if lingua.is_empty() || data.is_empty() {
        return Err(ModelError::Validation("lingua and data must not be empty".into()));
    }
    let am = ActiveModel {
        lingua: Set(lingua.to_string()),
        data: Set(data.to_string()),
        rank: Set(rank.map(str::to_string)),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn list_ordered(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn count_by_lingua(db: &DatabaseConnection) -> Result<Vec<LinguaCount>, ModelError> {
    let rows = Entity::find()
        .select_only()
        .column(Column::Lingua)
        .column_as(Expr::col(Column::Id).count(), "count")
        .group_by(Column::Lingua)
        .into_model::<LinguaCount>()
        .all(db)
        .await?;
    Ok(rows)
}
