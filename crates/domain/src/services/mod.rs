//! Domain services for Course Tracker.
//!
//! Services contain business logic that operates on domain models.

pub mod enrollment_rules;
pub mod gpa;

pub use enrollment_rules::{classify_rejection, RejectionCode};
pub use gpa::{compute_gpa, summarize_gpa};
