//! Student registration and lookup.
//!
//! Creating a student also creates its scholarship; both rows are written in one
//! transaction by the repository so a failure leaves nothing behind.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;
