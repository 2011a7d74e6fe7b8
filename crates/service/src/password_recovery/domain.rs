use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordRecoveryRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetInput {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryToken {
    pub id: i32,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl RecoveryToken {
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool { self.used_at.is_none() && now < self.expires_at }
}

impl From<models::password_recovery_token::Model> for RecoveryToken {
    fn from(m: models::password_recovery_token::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            token_hash: m.token_hash,
            expires_at: m.expires_at.with_timezone(&Utc),
            used_at: m.used_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}
