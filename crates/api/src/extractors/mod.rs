//! Custom Axum extractors.
//!
//! Extractors for the signed-in principal and flash notices.

pub mod flash;
pub mod session;

pub use flash::{Flash, Notice, NoticeLevel};
pub use session::{CurrentPrincipal, MaybePrincipal};
