//! Application services behind the route handlers.

pub mod auth;
pub mod bootstrap;
pub mod cookies;
pub mod enrollment;
pub mod reporting;

pub use auth::{AuthError, AuthService};
pub use cookies::CookieHelper;
pub use enrollment::{EnrollmentError, EnrollmentService};
pub use reporting::{Report, ReportingService};
