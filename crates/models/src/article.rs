use sea_orm::{entity::prelude::*, Set};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::student;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    pub published_at: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Student }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Student => Entity::belongs_to(student::Entity)
                .from(Column::StudentId)
                .to(student::Column::Id)
                .into(),
        }
    }
}

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef { Relation::Student.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), ModelError> {
    let t = title.trim();
    if t.is_empty() { return Err(ModelError::Validation("title required".into())); }
    if t.len() > 255 { return Err(ModelError::Validation("title too long (<=255)".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
    title: &str,
    summary: Option<&str>,
    published_at: Option<NaiveDate>,
) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    let am = ActiveModel {
        student_id: Set(student_id),
        title: Set(title.trim().to_string()),
        summary: Set(summary.map(str::to_string)),
        published_at: Set(published_at),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(ModelError::from_db)
}
