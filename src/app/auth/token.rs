//! Bearer credential extraction. Pure header inspection, no I/O.

use axum::http::{header, HeaderMap};

/// Cookie the browser client stores its access token in. The value is
/// URL-encoded on the wire.
pub const SESSION_COOKIE: &str = "sb-access-token";

/// Pull the caller's access token out of the request headers.
///
/// Priority: `Authorization: Bearer <token>`, then the session cookie.
/// Returns None when neither carries a token; the caller reports that as 401.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        if name == SESSION_COOKIE {
            return urlencoding::decode(value).ok().map(|v| v.into_owned());
        }
    }

    None
}
