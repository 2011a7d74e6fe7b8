use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{debug, info, instrument};

use common::crypto::verify_password;

use super::domain::{AuthSession, AuthStudent, Claims, LoginInput};
use super::errors::AuthError;
use crate::student::domain::{StudentFilter, StudentRecord, StudentResponse};
use crate::student::repository::StudentRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self { Self { jwt_secret: configs::DEV_JWT_SECRET.into(), token_ttl_hours: 12 } }
}

/// Auth business service independent of web framework
pub struct AuthService {
    repo: Arc<dyn StudentRepository>,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(repo: Arc<dyn StudentRepository>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Authenticate a student by email and password and issue a token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let student = self.repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let ok = verify_password(&input.password, &student.password_hash)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        if !ok {
            debug!("password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let (token, exp) = self.issue_token(&student)?;
        info!(student_id = student.id, "student_logged_in");
        Ok(AuthSession { student: AuthStudent::from(&student), token, expires_at: exp as i64 })
    }

    /// Sign an HS256 token for `student`; returns the token and its `exp`.
    pub fn issue_token(&self, student: &StudentRecord) -> Result<(String, usize), AuthError> {
        let now = Utc::now();
        let exp = (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims { sub: student.id.to_string(), email: student.email.clone(), iat: now.timestamp() as usize, exp };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok((token, exp))
    }

    /// Decode and validate signature and expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(data.claims)
    }

    /// Profile of the student the claims were issued to.
    pub async fn me(&self, claims: &Claims) -> Result<StudentResponse, AuthError> {
        let id = claims.student_id().ok_or_else(|| AuthError::TokenError("malformed subject".into()))?;
        self.repo
            .find_profiles(StudentFilter::Id(id))
            .await?
            .into_iter()
            .next()
            .map(StudentResponse::from)
            .ok_or(AuthError::NotFound)
    }
}
