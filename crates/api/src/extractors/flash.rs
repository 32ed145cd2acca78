//! One-shot notices carried across redirects.
//!
//! Notices travel in a cookie holding base64url-encoded JSON. A page that
//! renders them clears the cookie; a redirect carries unread notices forward
//! together with any new ones.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::LOCATION, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::services::cookies::CookieHelper;

/// Upper bound on notices kept in one cookie.
const MAX_NOTICES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

pub fn encode_notices(notices: &[Notice]) -> Option<String> {
    let json = serde_json::to_vec(notices).ok()?;
    Some(URL_SAFE_NO_PAD.encode(json))
}

/// Undecodable cookies yield no notices.
pub fn decode_notices(encoded: &str) -> Vec<Notice> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Vec<Notice>>(&bytes).ok())
        .unwrap_or_default()
}

/// A rendered page: the view model plus its notices.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub notices: Vec<Notice>,
    #[serde(flatten)]
    pub view: T,
}

/// Incoming notices plus the ones the current handler adds.
#[derive(Debug, Clone)]
pub struct Flash {
    cookies: CookieHelper,
    notices: Vec<Notice>,
    had_cookie: bool,
}

impl Flash {
    pub fn from_headers(cookies: &CookieHelper, headers: &HeaderMap) -> Self {
        let incoming = cookies.extract_flash(headers);
        Self {
            cookies: cookies.clone(),
            notices: incoming.map(decode_notices).unwrap_or_default(),
            had_cookie: incoming.is_some(),
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn with(mut self, notice: Notice) -> Self {
        self.push(notice);
        self
    }

    /// Renders `view` as JSON with every pending notice, consuming the flash cookie.
    pub fn page<T: Serialize>(self, view: T) -> Response {
        let mut response = (
            StatusCode::OK,
            Json(Page {
                notices: self.notices,
                view,
            }),
        )
            .into_response();

        if self.had_cookie {
            CookieHelper::append(
                response.headers_mut(),
                &self.cookies.build_clear_flash_cookie(),
            );
        }
        response
    }

    /// `303 See Other` to `location`, carrying pending notices in the flash cookie.
    pub fn redirect(self, location: &str) -> Response {
        let mut response = StatusCode::SEE_OTHER.into_response();
        let headers = response.headers_mut();

        match HeaderValue::from_str(location) {
            Ok(value) => {
                headers.insert(LOCATION, value);
            }
            Err(_) => {
                headers.insert(LOCATION, HeaderValue::from_static("/"));
            }
        }

        let start = self.notices.len().saturating_sub(MAX_NOTICES);
        match encode_notices(&self.notices[start..]) {
            Some(encoded) if start < self.notices.len() => {
                CookieHelper::append(headers, &self.cookies.build_flash_cookie(&encoded));
            }
            _ if self.had_cookie => {
                CookieHelper::append(headers, &self.cookies.build_clear_flash_cookie());
            }
            _ => {}
        }
        response
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Flash::from_headers(&state.cookies, &parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use axum::http::header::{COOKIE, SET_COOKIE};

    fn cookies() -> CookieHelper {
        CookieHelper::new(&SessionConfig {
            secret_key: "unit-test-secret".to_string(),
            cookie_name: "ct_session".to_string(),
            flash_cookie_name: "ct_flash".to_string(),
            ttl_secs: 60,
            secure: false,
        })
    }

    fn headers_with_flash(notices: &[Notice]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = format!("ct_flash={}", encode_notices(notices).unwrap());
        headers.insert(COOKIE, HeaderValue::from_str(&value).unwrap());
        headers
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_notice_encoding_is_cookie_safe() {
        let notices = vec![
            Notice::success("Welcome, Ada Byron!"),
            Notice::error("Enrollment failed: value; with=specials"),
        ];
        let encoded = encode_notices(&notices).unwrap();

        assert!(!encoded.contains(';'));
        assert!(!encoded.contains('='));
        assert_eq!(decode_notices(&encoded), notices);
    }

    #[test]
    fn test_decode_garbage_yields_nothing() {
        assert!(decode_notices("not base64 at all!").is_empty());
        assert!(decode_notices(&URL_SAFE_NO_PAD.encode(b"{\"x\":1}")).is_empty());
    }

    #[test]
    fn test_notice_level_serializes_lowercase() {
        let json = serde_json::to_value(Notice::warning("careful")).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["message"], "careful");
    }

    #[test]
    fn test_page_drains_incoming_cookie() {
        let headers = headers_with_flash(&[Notice::info("Goodbye!")]);
        let flash = Flash::from_headers(&cookies(), &headers);
        assert_eq!(flash.notices().len(), 1);

        let response = flash.page(serde_json::json!({ "title": "Home" }));
        assert_eq!(response.status(), StatusCode::OK);

        let cleared = set_cookies(&response);
        assert_eq!(cleared.len(), 1);
        assert!(cleared[0].starts_with("ct_flash=;"));
    }

    #[test]
    fn test_page_without_cookie_sets_nothing() {
        let flash = Flash::from_headers(&cookies(), &HeaderMap::new());
        let response = flash.page(serde_json::json!({}));
        assert!(set_cookies(&response).is_empty());
    }

    #[test]
    fn test_redirect_carries_old_and_new_notices() {
        let headers = headers_with_flash(&[Notice::info("first")]);
        let response = Flash::from_headers(&cookies(), &headers)
            .with(Notice::error("second"))
            .redirect("/auth/login");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/auth/login");

        let cookie = &set_cookies(&response)[0];
        let value = cookie
            .strip_prefix("ct_flash=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        let carried = decode_notices(value);
        assert_eq!(carried.len(), 2);
        assert_eq!(carried[1].message, "second");
    }

    #[test]
    fn test_redirect_keeps_only_latest_notices() {
        let mut flash = Flash::from_headers(&cookies(), &HeaderMap::new());
        for i in 0..(MAX_NOTICES + 3) {
            flash.push(Notice::info(format!("notice {}", i)));
        }
        let response = flash.redirect("/");
        let cookie = &set_cookies(&response)[0];
        let value = cookie
            .strip_prefix("ct_flash=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        let carried = decode_notices(value);
        assert_eq!(carried.len(), MAX_NOTICES);
        assert_eq!(carried[0].message, "notice 3");
    }
}
