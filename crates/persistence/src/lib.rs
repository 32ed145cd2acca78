//! Persistence layer for the Course Tracker backend.
//!
//! This crate contains:
//! - Database connection management
//! - The data access gateway every query goes through
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Migrations (schema, views, routines, enrollment trigger, seed data)

pub mod db;
pub mod entities;
pub mod gateway;
pub mod metrics;
pub mod repositories;

pub use gateway::{Gateway, GatewayError, SqlParam};
