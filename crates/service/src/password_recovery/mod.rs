//! Forgotten-password flow: issue a one-time token, then redeem it for a new password.
//!
//! Only the sha-256 of a token is stored; the plaintext goes to the notifier and nowhere else.

pub mod domain;
pub mod notifier;
pub mod repository;
pub mod service;
