use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use rand::RngCore;
use serde_json::json;

use crate::config::SESSION_COOKIE;
use crate::error::{ApiError, QuoteError};

pub fn random_session_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex::encode(b)
}

/// Session id carried by the request, if any. Read-only handlers use this so
/// that anonymous reads neither mint cookies nor create sessions.
pub fn existing_session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Session id from the cookie jar, minting a new cookie on first visit.
pub fn session_cookie(jar: CookieJar) -> (CookieJar, String) {
    if let Some(c) = jar.get(SESSION_COOKIE) {
        let sid = c.value().to_string();
        return (jar, sid);
    }
    let sid = random_session_id();
    let cookie = Cookie::build((SESSION_COOKIE, sid.clone()))
        .path("/")
        .http_only(true)
        .build();
    (jar.add(cookie), sid)
}

pub fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let status = match self {
            QuoteError::VmLimitReached { .. } => StatusCode::CONFLICT,
            QuoteError::IncompleteSpec
            | QuoteError::UnsupportedClockTier(_)
            | QuoteError::WizardIncomplete(_) => StatusCode::UNPROCESSABLE_ENTITY,
            QuoteError::TemplateNotFound(_) | QuoteError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            QuoteError::NotAnAddon(_) => StatusCode::BAD_REQUEST,
        };
        error_response(status, self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Backend call failed");
        error_response(StatusCode::BAD_GATEWAY, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_random_hex() {
        let a = random_session_id();
        let b = random_session_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn existing_cookie_is_reused() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "abc"));
        assert_eq!(existing_session_id(&jar).as_deref(), Some("abc"));
        let (_, sid) = session_cookie(jar);
        assert_eq!(sid, "abc");
        assert_eq!(existing_session_id(&CookieJar::new()), None);
    }

    #[test]
    fn maps_engine_errors_to_statuses() {
        assert_eq!(
            QuoteError::VmLimitReached { limit: 5 }.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            QuoteError::ProductNotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
