use sea_orm::{entity::prelude::*, sea_query::Expr, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::{advisor, article, scholarship};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub tax_id: String,
    #[sea_orm(unique)]
    pub enrollment_number: String,
    pub course: String,
    /// argon2 PHC string, never the plaintext
    #[serde(skip_serializing)]
    pub password: String,
    pub advisor_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Advisor,
    Article,
    Scholarship,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Advisor => Entity::belongs_to(advisor::Entity)
                .from(Column::AdvisorId)
                .to(advisor::Column::Id)
                .into(),
            Relation::Article => Entity::has_many(article::Entity).into(),
            Relation::Scholarship => Entity::has_one(scholarship::Entity).into(),
        }
    }
}

impl Related<advisor::Entity> for Entity {
    fn to() -> RelationDef { Relation::Advisor.def() }
}

impl Related<article::Entity> for Entity {
    fn to() -> RelationDef { Relation::Article.def() }
}

impl Related<scholarship::Entity> for Entity {
    fn to() -> RelationDef { Relation::Scholarship.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Row to insert; the password is already hashed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub enrollment_number: String,
    pub course: String,
    pub password_hash: String,
    pub advisor_id: i32,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub enrollment_number: Option<String>,
    pub course: Option<String>,
    pub password_hash: Option<String>,
    pub advisor_id: Option<i32>,
}

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let e = email.trim();
    if e.is_empty() || !e.contains('@') { return Err(ModelError::Validation("invalid email".into())); }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    Ok(())
}

pub fn validate_required(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() { return Err(ModelError::Validation(format!("{field} required"))); }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ModelError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, new: &NewStudent) -> Result<Model, errors::ModelError> {
    validate_name(&new.name)?;
    validate_email(&new.email)?;
    validate_required("tax_id", &new.tax_id)?;
    validate_required("enrollment_number", &new.enrollment_number)?;
    validate_required("course", &new.course)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(new.name.clone()),
        email: Set(new.email.clone()),
        tax_id: Set(new.tax_id.clone()),
        enrollment_number: Set(new.enrollment_number.clone()),
        course: Set(new.course.clone()),
        password: Set(new.password_hash.clone()),
        advisor_id: Set(new.advisor_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

/// Apply `changes` to the student owning `tax_id`; `Ok(None)` when nobody does.
pub async fn update_by_tax_id<C: ConnectionTrait>(
    db: &C,
    tax_id: &str,
    changes: &StudentChanges,
) -> Result<Option<Model>, errors::ModelError> {
    let Some(found) = Entity::find()
        .filter(Column::TaxId.eq(tax_id))
        .one(db)
        .await
        .map_err(ModelError::from_db)? else { return Ok(None) };
    let mut am: ActiveModel = found.into();
    if let Some(v) = &changes.name { validate_name(v)?; am.name = Set(v.clone()); }
    if let Some(v) = &changes.email { validate_email(v)?; am.email = Set(v.clone()); }
    if let Some(v) = &changes.enrollment_number { validate_required("enrollment_number", v)?; am.enrollment_number = Set(v.clone()); }
    if let Some(v) = &changes.course { validate_required("course", v)?; am.course = Set(v.clone()); }
    if let Some(v) = &changes.password_hash { am.password = Set(v.clone()); }
    if let Some(v) = changes.advisor_id { am.advisor_id = Set(v); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(ModelError::from_db)?;
    Ok(Some(updated))
}

/// Replace the password hash of the student with `email`; returns false when no row matched.
pub async fn update_password_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password_hash: &str,
) -> Result<bool, errors::ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::Password, Expr::value(password_hash.to_string()))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Email.eq(email))
        .exec(db)
        .await
        .map_err(ModelError::from_db)?;
    Ok(res.rows_affected > 0)
}
