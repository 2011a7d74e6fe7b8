//! Student login and bearer tokens.

pub mod domain;
pub mod errors;
pub mod service;
