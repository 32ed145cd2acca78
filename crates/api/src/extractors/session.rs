//! Session extractors.
//!
//! The role guard verifies the session cookie and stores the [`Principal`] in
//! request extensions; handlers behind a guard take [`CurrentPrincipal`].
//! Public pages that only vary on login state take [`MaybePrincipal`].

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
    response::Response,
};
use domain::models::Principal;
use shared::session_token::{SessionSigner, SessionTokenError};

use crate::app::AppState;
use crate::extractors::flash::{Flash, Notice};
use crate::services::cookies::CookieHelper;

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Reads and verifies the session cookie. Tampered or expired tokens count as no session.
pub fn session_principal(
    signer: &SessionSigner,
    cookies: &CookieHelper,
    headers: &HeaderMap,
) -> Option<Principal> {
    let token = cookies.extract_session_token(headers)?;

    match signer.verify::<Principal>(token) {
        Ok(claims) => Some(claims.data),
        Err(SessionTokenError::Expired) => {
            tracing::debug!("Session cookie expired");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected session cookie");
            None
        }
    }
}

/// The signed-in principal placed in extensions by the role guard.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(CurrentPrincipal(principal.clone()));
        }

        match session_principal(&state.signer, &state.cookies, &parts.headers) {
            Some(principal) => Ok(CurrentPrincipal(principal)),
            None => Err(Flash::from_headers(&state.cookies, &parts.headers)
                .with(Notice::error(LOGIN_REQUIRED_MESSAGE))
                .redirect("/auth/login")),
        }
    }
}

/// The principal when a valid session is present.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

#[async_trait]
impl FromRequestParts<AppState> for MaybePrincipal {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(MaybePrincipal(Some(principal.clone())));
        }
        Ok(MaybePrincipal(session_principal(
            &state.signer,
            &state.cookies,
            &parts.headers,
        )))
    }
}
