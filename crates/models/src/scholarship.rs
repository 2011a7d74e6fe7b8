use sea_orm::{entity::prelude::*, Set};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::student;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scholarship")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub student_id: i32,
    pub scholarship_starts_at: Date,
    pub scholarship_ends_at: Date,
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

/// The window is half-open, so an empty or inverted one is rejected.
pub fn validate_window(starts_at: NaiveDate, ends_at: NaiveDate) -> Result<(), ModelError> {
    if starts_at >= ends_at {
        return Err(ModelError::Validation("Scholarship start date must be before the end date".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
    starts_at: NaiveDate,
    ends_at: NaiveDate,
) -> Result<Model, errors::ModelError> {
    validate_window(starts_at, ends_at)?;
    let am = ActiveModel {
        student_id: Set(student_id),
        scholarship_starts_at: Set(starts_at),
        scholarship_ends_at: Set(ends_at),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(ModelError::from_db)
}
