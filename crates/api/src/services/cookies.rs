//! Cookie helper for the session and flash cookies.
//!
//! Both cookies are HttpOnly and SameSite=Lax so they survive the 303
//! redirects the pages use after a form post.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use crate::config::SessionConfig;

/// Flash cookies only need to outlive one redirect.
const FLASH_MAX_AGE_SECS: i64 = 300;

#[derive(Debug, Clone)]
pub struct CookieHelper {
    session_name: String,
    flash_name: String,
    secure: bool,
    session_max_age_secs: i64,
}

impl CookieHelper {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            session_name: config.cookie_name.clone(),
            flash_name: config.flash_cookie_name.clone(),
            secure: config.secure,
            session_max_age_secs: config.ttl_secs,
        }
    }

    /// Set-Cookie value carrying a signed session token.
    pub fn build_session_cookie(&self, token: &str) -> String {
        self.build_cookie(&self.session_name, token, self.session_max_age_secs)
    }

    /// Set-Cookie value that removes the session entirely.
    pub fn build_clear_session_cookie(&self) -> String {
        self.build_clear_cookie(&self.session_name)
    }

    /// Set-Cookie value carrying encoded flash notices.
    pub fn build_flash_cookie(&self, encoded: &str) -> String {
        self.build_cookie(&self.flash_name, encoded, FLASH_MAX_AGE_SECS)
    }

    pub fn build_clear_flash_cookie(&self) -> String {
        self.build_clear_cookie(&self.flash_name)
    }

    /// Appends a Set-Cookie header. Values that are not valid header text are skipped.
    pub fn append(headers: &mut HeaderMap, cookie: &str) {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(_) => tracing::warn!("Dropping Set-Cookie value that is not valid header text"),
        }
    }

    /// Extract a cookie value from request headers by name.
    ///
    /// Every `Cookie` header is searched; browsers send one, but proxies may split them.
    pub fn extract_cookie<'a>(&self, headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|cookie_header| cookie_header.split(';'))
            .map(str::trim)
            .find_map(|cookie| {
                let (cookie_name, cookie_value) = cookie.split_once('=')?;
                (cookie_name == name && !cookie_value.is_empty()).then_some(cookie_value)
            })
    }

    pub fn extract_session_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        self.extract_cookie(headers, &self.session_name)
    }

    pub fn extract_flash<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        self.extract_cookie(headers, &self.flash_name)
    }

    fn build_cookie(&self, name: &str, value: &str, max_age: i64) -> String {
        let mut cookie = format!("{}={}; Path=/; Max-Age={}; HttpOnly", name, value, max_age);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=Lax");
        cookie
    }

    fn build_clear_cookie(&self, name: &str) -> String {
        let mut cookie = format!(
            "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly",
            name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=Lax");
        cookie
    }
}
