//! Login and logout.

use axum::{extract::State, response::Response, Form};
use domain::models::{LoginForm, Principal};
use serde::Serialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::validation_message;
use crate::extractors::{Flash, MaybePrincipal, Notice};
use crate::middleware::metrics::record_login_attempt;
use crate::services::CookieHelper;

const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub action: &'static str,
    pub fields: [&'static str; 2],
}

pub fn welcome_message(principal: &Principal) -> String {
    format!("Welcome back, {}!", principal.display_name())
}

pub fn goodbye_message(principal: Option<&Principal>) -> String {
    match principal {
        Some(p) => format!("You have been logged out. Goodbye, {}!", p.username),
        None => "You have been logged out.".to_string(),
    }
}

/// `GET /auth/login`
pub async fn login_page(MaybePrincipal(principal): MaybePrincipal, flash: Flash) -> Response {
    if let Some(principal) = principal {
        return flash.redirect(principal.role.home_path());
    }

    flash.page(LoginView {
        action: LOGIN_PATH,
        fields: ["username", "password"],
    })
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    flash: Flash,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        record_login_attempt("invalid_form");
        return flash
            .with(Notice::error(validation_message(&errors)))
            .redirect(LOGIN_PATH);
    }

    let username = form.normalized_username();
    let principal = match state.auth.authenticate(username, &form.password).await {
        Ok(Some(principal)) => principal,
        Ok(None) => {
            record_login_attempt("rejected");
            return flash
                .with(Notice::error("Invalid username or password. Please try again."))
                .redirect(LOGIN_PATH);
        }
        Err(e) => {
            record_login_attempt("error");
            tracing::error!(error = %e, "Login could not be checked");
            return flash
                .with(Notice::error(
                    "Login is unavailable right now. Please try again later.",
                ))
                .redirect(LOGIN_PATH);
        }
    };

    let token = match state.signer.issue(&principal) {
        Ok(token) => token,
        Err(e) => {
            record_login_attempt("error");
            tracing::error!(error = %e, "Failed to sign session");
            return flash
                .with(Notice::error(
                    "Login is unavailable right now. Please try again later.",
                ))
                .redirect(LOGIN_PATH);
        }
    };

    record_login_attempt("success");
    let mut response = flash
        .with(Notice::success(welcome_message(&principal)))
        .redirect(principal.role.home_path());
    CookieHelper::append(
        response.headers_mut(),
        &state.cookies.build_session_cookie(&token),
    );
    response
}

/// `GET /auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    flash: Flash,
) -> Response {
    if let Some(p) = &principal {
        tracing::info!(user_id = p.user_id, "Logged out");
    }

    let mut response = flash
        .with(Notice::info(goodbye_message(principal.as_ref())))
        .redirect("/");
    CookieHelper::append(
        response.headers_mut(),
        &state.cookies.build_clear_session_cookie(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Role;

    fn principal(role: Role, student_name: Option<&str>) -> Principal {
        Principal {
            user_id: 3,
            username: "someone".to_string(),
            role,
            student_id: student_name.map(|_| 4001),
            student_name: student_name.map(str::to_string),
        }
    }

    #[test]
    fn test_welcome_uses_student_name() {
        let p = principal(Role::Student, Some("Ada Byron"));
        assert_eq!(welcome_message(&p), "Welcome back, Ada Byron!");
    }

    #[test]
    fn test_welcome_uses_username_for_admin() {
        let p = principal(Role::Admin, None);
        assert_eq!(welcome_message(&p), "Welcome back, someone!");
    }

    #[test]
    fn test_goodbye_message() {
        let p = principal(Role::Admin, None);
        assert_eq!(
            goodbye_message(Some(&p)),
            "You have been logged out. Goodbye, someone!"
        );
        assert_eq!(goodbye_message(None), "You have been logged out.");
    }
}
