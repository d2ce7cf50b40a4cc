//! Session cookie handling
//!
//! Maps the browser's `user_id` cookie to an identity token on the way in,
//! and hands freshly minted tokens back on the way out.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use tracing::warn;

use crate::chat::Identity;
use crate::config::SessionConfig;

/// Extract the session token from the request's cookies
pub fn read_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let prefix = format!("{}=", cookie_name);

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

/// `Set-Cookie` value persisting an identity in the browser
pub fn session_cookie(config: &SessionConfig, identity: &Identity) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name,
        identity,
        config.cookie_max_age_secs()
    )
}

/// Attach the session cookie to a response when the identity is new
pub fn attach_if_new(
    mut response: Response,
    config: &SessionConfig,
    identity: &Identity,
    is_new: bool,
) -> Response {
    if !is_new {
        return response;
    }

    match HeaderValue::from_str(&session_cookie(config, identity)) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => warn!("Could not encode session cookie for {}: {}", identity, e),
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_read_token() {
        let headers = headers_with_cookie("theme=dark; user_id=abc-123; other=x");
        assert_eq!(read_token(&headers, "user_id"), Some("abc-123".to_string()));
    }

    #[test]
    fn test_read_token_missing_or_empty() {
        assert_eq!(read_token(&HeaderMap::new(), "user_id"), None);

        let headers = headers_with_cookie("user_id=");
        assert_eq!(read_token(&headers, "user_id"), None);

        let headers = headers_with_cookie("not_user_id=abc");
        assert_eq!(read_token(&headers, "user_id"), None);
    }

    #[test]
    fn test_session_cookie_format() {
        let config = SessionConfig::default();
        let identity = Identity::from_known("abc-123");
        assert_eq!(
            session_cookie(&config, &identity),
            "user_id=abc-123; Path=/; HttpOnly; SameSite=Lax; Max-Age=2592000"
        );
    }

    #[test]
    fn test_attach_only_when_new() {
        let config = SessionConfig::default();
        let identity = Identity::from_known("abc-123");

        let response = attach_if_new("ok".into_response(), &config, &identity, false);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let response = attach_if_new("ok".into_response(), &config, &identity, true);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().starts_with("user_id=abc-123;"));
    }
}
