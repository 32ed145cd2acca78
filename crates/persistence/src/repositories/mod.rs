//! Repository implementations for database operations.
//!
//! Repositories own the SQL text and send it through the [`Gateway`](crate::gateway::Gateway).

pub mod catalog;
pub mod credential;
pub mod enrollment;
pub mod report;

pub use catalog::CatalogRepository;
pub use credential::CredentialRepository;
pub use enrollment::EnrollmentRepository;
pub use report::ReportRepository;
