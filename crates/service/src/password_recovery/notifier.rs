use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::ServiceError;

/// Delivers a plaintext recovery token to the student.
#[async_trait]
pub trait RecoveryNotifier: Send + Sync {
    async fn send_recovery(&self, email: &str, token: &str) -> Result<(), ServiceError>;
}

/// Writes the token to the debug log instead of sending mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl RecoveryNotifier for LogNotifier {
    async fn send_recovery(&self, email: &str, token: &str) -> Result<(), ServiceError> {
        info!(%email, "password_recovery_issued");
        debug!(%email, %token, "password_recovery_token");
        Ok(())
    }
}
