//! Shared utilities for the Course Tracker backend.
//!
//! This crate provides functionality used by the other crates:
//! - Password hashing with Argon2id
//! - Signed session tokens (HS256)

pub mod password;
pub mod session_token;
