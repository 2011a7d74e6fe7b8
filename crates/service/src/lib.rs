//! Service layer providing the business workflows on top of models.
//! - Each domain exposes `domain` types, a `repository` trait and a `service`.
//! - SeaORM implementations live next to their trait; `mock` backs every trait in memory.
//! - Failures surface as `errors::ServiceError` (auth uses `auth::errors::AuthError`).

pub mod errors;
pub mod pagination;
pub mod advisor;
pub mod scholarship;
pub mod article;
pub mod student;
pub mod auth;
pub mod password_recovery;
pub mod mock;
pub mod registry;
#[cfg(test)]
pub mod test_support;
