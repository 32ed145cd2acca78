//! Role-based page guards.
//!
//! Guards never answer 401/403: an anonymous visitor is sent to the login
//! page and a signed-in user with the wrong role is sent to their own home.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use domain::models::{Principal, Role};

use crate::app::AppState;
use crate::extractors::flash::{Flash, Notice};
use crate::extractors::session::{session_principal, LOGIN_REQUIRED_MESSAGE};

/// Where a refused request is sent, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRedirect {
    pub location: &'static str,
    pub notice: Notice,
}

/// Decides whether `principal` may see a page that requires `required`.
pub fn check_role(principal: Option<&Principal>, required: Role) -> Result<(), GuardRedirect> {
    match principal {
        None => Err(GuardRedirect {
            location: "/auth/login",
            notice: Notice::error(LOGIN_REQUIRED_MESSAGE),
        }),
        Some(p) if p.role == required => Ok(()),
        Some(p) => Err(GuardRedirect {
            location: p.role.home_path(),
            notice: Notice::error(p.role.access_denied_message()),
        }),
    }
}

/// Requires a signed-in student.
pub async fn require_student(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    guard(Role::Student, state, req, next).await
}

/// Requires a signed-in administrator.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    guard(Role::Admin, state, req, next).await
}

async fn guard(required: Role, state: AppState, mut req: Request<Body>, next: Next) -> Response {
    let principal = session_principal(&state.signer, &state.cookies, req.headers());

    match check_role(principal.as_ref(), required) {
        Ok(()) => {
            if let Some(principal) = principal {
                req.extensions_mut().insert(principal);
            }
            next.run(req).await
        }
        Err(refusal) => {
            tracing::info!(
                required = %required,
                user = principal.as_ref().map(|p| p.username.as_str()).unwrap_or("anonymous"),
                path = %req.uri().path(),
                "Page access refused"
            );
            Flash::from_headers(&state.cookies, req.headers())
                .with(refusal.notice)
                .redirect(refusal.location)
        }
    }
}
