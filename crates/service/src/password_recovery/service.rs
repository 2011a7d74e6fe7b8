use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

use common::types::Message;
use models::student::{validate_email, validate_password};

use super::domain::{PasswordRecoveryRequest, PasswordResetInput};
use super::notifier::RecoveryNotifier;
use super::repository::RecoveryTokenRepository;
use crate::errors::ServiceError;
use crate::student::domain::UpdatePasswordInput;
use crate::student::repository::StudentRepository;
use crate::student::service::StudentService;

pub const RECOVERY_ACK: &str = "If the email is registered, recovery instructions have been sent";
pub const INVALID_TOKEN: &str = "Invalid or expired recovery token";

/// Hex sha-256 of a plaintext token, the only form that is persisted.
pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

pub struct PasswordRecoveryService {
    tokens: Arc<dyn RecoveryTokenRepository>,
    students: Arc<dyn StudentRepository>,
    student_service: Arc<StudentService>,
    notifier: Arc<dyn RecoveryNotifier>,
    ttl: chrono::Duration,
}

impl PasswordRecoveryService {
    pub fn new(
        tokens: Arc<dyn RecoveryTokenRepository>,
        students: Arc<dyn StudentRepository>,
        student_service: Arc<StudentService>,
        notifier: Arc<dyn RecoveryNotifier>,
        ttl: chrono::Duration,
    ) -> Self {
        Self { tokens, students, student_service, notifier, ttl }
    }

    /// Issue a token when the email belongs to a student. The reply is identical either way.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn request_password_recovery(&self, input: PasswordRecoveryRequest) -> Result<Message, ServiceError> {
        validate_email(&input.email)?;
        if self.students.find_by_email(&input.email).await?.is_none() {
            info!("recovery requested for unknown email");
            return Ok(Message::new(RECOVERY_ACK));
        }
        let token = uuid::Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + self.ttl;
        self.tokens.insert(&input.email, &hash_token(&token), expires_at).await?;
        self.notifier.send_recovery(&input.email, &token).await?;
        Ok(Message::new(RECOVERY_ACK))
    }

    #[instrument(skip(self, input))]
    pub async fn reset_password(&self, input: PasswordResetInput) -> Result<Message, ServiceError> {
        validate_password(&input.password)?;
        // the token is spent before the password changes, so it redeems once
        let claimed = self.tokens.claim(&hash_token(&input.token), Utc::now()).await?;
        let Some(stored) = claimed else {
            warn!("recovery token rejected");
            return Err(ServiceError::Validation(INVALID_TOKEN.into()));
        };
        self.student_service
            .update_password(UpdatePasswordInput { email: stored.email.clone(), password: input.password })
            .await?;
        info!(token_id = stored.id, "password_reset_completed");
        Ok(Message::new("Password updated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{fixtures, CapturingNotifier, InMemoryStore};
    use crate::registry::{Repositories, Services, ServicesConfig};
    use common::crypto::verify_password;

    fn services(store: Arc<InMemoryStore>, notifier: Arc<CapturingNotifier>, ttl_minutes: i64) -> Services {
        let cfg = ServicesConfig { recovery_ttl: chrono::Duration::minutes(ttl_minutes), ..Default::default() };
        Services::new(Repositories::in_memory(store, notifier), cfg)
    }

    #[test]
    fn token_hash_is_sha256_hex() {
        let h = hash_token("abc");
        assert_eq!(h.len(), 64);
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[tokio::test]
    async fn token_resets_password_once() {
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(CapturingNotifier::default());
        fixtures::seed_student(&store, "rec@example.com", "Math").await;
        let svc = services(store.clone(), notifier.clone(), 30);

        let ack = svc
            .recovery
            .request_password_recovery(PasswordRecoveryRequest { email: "rec@example.com".into() })
            .await
            .unwrap();
        assert_eq!(ack.message, RECOVERY_ACK);
        let (email, token) = notifier.last().await.unwrap();
        assert_eq!(email, "rec@example.com");

        svc.recovery
            .reset_password(PasswordResetInput { token: token.clone(), password: "fresh-password".into() })
            .await
            .unwrap();
        let hash = store.password_hash("rec@example.com").await.unwrap();
        assert!(verify_password("fresh-password", &hash).unwrap());

        let reused = svc
            .recovery
            .reset_password(PasswordResetInput { token, password: "third-password".into() })
            .await
            .unwrap_err();
        assert!(matches!(reused, ServiceError::Validation(m) if m == INVALID_TOKEN));
    }

    #[tokio::test]
    async fn concurrent_resets_with_one_token_succeed_once() {
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(CapturingNotifier::default());
        fixtures::seed_student(&store, "race@example.com", "Math").await;
        let svc = services(store.clone(), notifier.clone(), 30);
        svc.recovery
            .request_password_recovery(PasswordRecoveryRequest { email: "race@example.com".into() })
            .await
            .unwrap();
        let (_, token) = notifier.last().await.unwrap();

        let (a, b) = tokio::join!(
            svc.recovery.reset_password(PasswordResetInput { token: token.clone(), password: "first-password".into() }),
            svc.recovery.reset_password(PasswordResetInput { token, password: "second-password".into() }),
        );
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);

        let winner = if a.is_ok() { "first-password" } else { "second-password" };
        let hash = store.password_hash("race@example.com").await.unwrap();
        assert!(verify_password(winner, &hash).unwrap());
    }

    #[tokio::test]
    async fn unknown_email_gets_same_ack_and_no_token() {
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(CapturingNotifier::default());
        let svc = services(store, notifier.clone(), 30);
        let ack = svc
            .recovery
            .request_password_recovery(PasswordRecoveryRequest { email: "ghost@example.com".into() })
            .await
            .unwrap();
        assert_eq!(ack.message, RECOVERY_ACK);
        assert!(notifier.last().await.is_none());
    }

    #[tokio::test]
    async fn expired_or_unknown_token_is_rejected() {
        let store = Arc::new(InMemoryStore::default());
        let notifier = Arc::new(CapturingNotifier::default());
        fixtures::seed_student(&store, "late@example.com", "Math").await;
        let svc = services(store, notifier.clone(), -1);

        svc.recovery
            .request_password_recovery(PasswordRecoveryRequest { email: "late@example.com".into() })
            .await
            .unwrap();
        let (_, token) = notifier.last().await.unwrap();
        let expired = svc.recovery.reset_password(PasswordResetInput { token, password: "fresh-password".into() }).await;
        assert!(matches!(expired, Err(ServiceError::Validation(m)) if m == INVALID_TOKEN));

        let bogus = svc
            .recovery
            .reset_password(PasswordResetInput { token: "not-a-token".into(), password: "fresh-password".into() })
            .await;
        assert!(matches!(bogus, Err(ServiceError::Validation(_))));
    }
}
