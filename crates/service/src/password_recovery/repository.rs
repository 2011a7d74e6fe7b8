use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use models::password_recovery_token as token;

use super::domain::RecoveryToken;
use crate::errors::ServiceError;

#[async_trait]
pub trait RecoveryTokenRepository: Send + Sync {
    async fn insert(&self, email: &str, token_hash: &str, expires_at: DateTime<Utc>) -> Result<RecoveryToken, ServiceError>;
    /// Atomically mark an unused, unexpired token as used. `None` when the
    /// token is unknown, expired, or already taken.
    async fn claim(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<RecoveryToken>, ServiceError>;
}

pub struct SeaOrmRecoveryTokenRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl RecoveryTokenRepository for SeaOrmRecoveryTokenRepository {
    async fn insert(&self, email: &str, token_hash: &str, expires_at: DateTime<Utc>) -> Result<RecoveryToken, ServiceError> {
        let created = token::create(&self.db, email, token_hash, expires_at.into()).await?;
        Ok(created.into())
    }

    async fn claim(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<RecoveryToken>, ServiceError> {
        Ok(token::claim(&self.db, token_hash, now.into()).await?.map(RecoveryToken::from))
    }
}
