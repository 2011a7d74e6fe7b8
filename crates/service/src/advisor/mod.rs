//! Advisors supervising students. Read by student creation, written only through this service.

pub mod domain;
pub mod repository;
pub mod service;
