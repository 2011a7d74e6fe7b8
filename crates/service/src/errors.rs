use thiserror::Error;

use common::crypto::CryptoError;
use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("notification error: {0}")]
    Notify(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn db(e: impl std::fmt::Display) -> Self { Self::Db(e.to_string()) }

    /// True when the caller sent something wrong, as opposed to a storage or server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::NotFound(_)
                | Self::Model(ModelError::Validation(_) | ModelError::Duplicate(_) | ModelError::MissingReference(_))
        )
    }

    /// The message without the category prefix, for response bodies.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(m) | Self::NotFound(m) | Self::Hash(m) | Self::Notify(m) | Self::Db(m) => m.clone(),
            Self::Model(ModelError::Validation(m))
            | Self::Model(ModelError::Duplicate(m))
            | Self::Model(ModelError::MissingReference(m))
            | Self::Model(ModelError::Db(m)) => m.clone(),
        }
    }

    /// Rewrite storage constraint violations into caller-facing errors.
    pub fn on_constraint(self, on_duplicate: impl FnOnce(&str) -> String, missing: &str) -> Self {
        match self {
            Self::Model(ModelError::Duplicate(raw)) => Self::Validation(on_duplicate(&raw)),
            Self::Model(ModelError::MissingReference(_)) => Self::NotFound(missing.to_string()),
            other => other,
        }
    }
}

impl From<CryptoError> for ServiceError {
    fn from(e: CryptoError) -> Self { Self::Hash(e.to_string()) }
}
