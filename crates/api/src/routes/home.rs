//! Landing page.

use axum::response::Response;
use serde::Serialize;

use crate::extractors::{Flash, MaybePrincipal};

#[derive(Debug, Serialize)]
pub struct LandingView {
    pub title: &'static str,
    pub login_url: &'static str,
}

/// Signed-in users go to their home; everyone else sees the landing page.
pub async fn index(MaybePrincipal(principal): MaybePrincipal, flash: Flash) -> Response {
    match principal {
        Some(principal) => flash.redirect(principal.role.home_path()),
        None => flash.page(LandingView {
            title: "Course Tracker",
            login_url: "/auth/login",
        }),
    }
}
