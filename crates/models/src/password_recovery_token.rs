use sea_orm::{entity::prelude::*, sea_query::Expr, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_recovery_token")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub expires_at: DateTimeWithTimeZone,
    pub used_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    email: &str,
    token_hash: &str,
    expires_at: DateTimeWithTimeZone,
) -> Result<Model, errors::ModelError> {
    if token_hash.len() != 64 { return Err(ModelError::Validation("token_hash must be sha-256 hex".into())); }
    let am = ActiveModel {
        email: Set(email.to_string()),
        token_hash: Set(token_hash.to_string()),
        expires_at: Set(expires_at),
        used_at: Set(None),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

pub async fn find_by_hash<C: ConnectionTrait>(db: &C, token_hash: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::TokenHash.eq(token_hash))
        .one(db)
        .await
        .map_err(ModelError::from_db)
}

/// Consume an unused, unexpired token in a single conditional update.
/// Returns the row only to the caller whose update took it.
pub async fn claim<C: ConnectionTrait>(
    db: &C,
    token_hash: &str,
    now: DateTimeWithTimeZone,
) -> Result<Option<Model>, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::UsedAt, Expr::value(now))
        .filter(Column::TokenHash.eq(token_hash))
        .filter(Column::UsedAt.is_null())
        .filter(Column::ExpiresAt.gt(now))
        .exec(db)
        .await
        .map_err(ModelError::from_db)?;
    if res.rows_affected != 1 {
        return Ok(None);
    }
    find_by_hash(db, token_hash).await
}
