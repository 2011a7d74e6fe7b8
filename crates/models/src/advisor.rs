use sea_orm::{entity::prelude::*, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::student;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "advisor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub tax_id: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Student }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Student => Entity::has_many(student::Entity).into() }
    }
}

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef { Relation::Student.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    Ok(())
}

pub fn validate_tax_id(tax_id: &str) -> Result<(), ModelError> {
    let t = tax_id.trim();
    if t.is_empty() { return Err(ModelError::Validation("tax_id required".into())); }
    if t.len() > 32 { return Err(ModelError::Validation("tax_id too long (<=32)".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, tax_id: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_tax_id(tax_id)?;
    let am = ActiveModel {
        name: Set(name.trim().to_string()),
        tax_id: Set(tax_id.trim().to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(ModelError::from_db)
}
