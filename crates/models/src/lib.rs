//! SeaORM entities for the scholarship administration schema, with the
//! validation and insert/update helpers each table needs.

pub mod errors;
pub mod db;
pub mod advisor;
pub mod student;
pub mod scholarship;
pub mod article;
pub mod password_recovery_token;

#[cfg(test)]
mod tests;
