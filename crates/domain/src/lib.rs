//! Domain layer for the Course Tracker backend.
//!
//! This crate contains:
//! - Domain models (Principal, enrollment records, catalog and report rows)
//! - Grade-point mapping and GPA computation
//! - The enrollment rejection taxonomy

pub mod models;
pub mod services;
