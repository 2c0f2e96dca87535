//! Session cookie assembly and extraction.
//!
//! The signed credential travels exclusively in an `HttpOnly` cookie so
//! page scripts never see it.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use chrono::Duration;

use crate::config::CookieConfig;

/// Builds the `Set-Cookie` value that installs a session credential.
pub fn session_cookie(config: &CookieConfig, token: &str, ttl: Duration) -> String {
    build_cookie(config, token, ttl.num_seconds())
}

/// Builds the `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &CookieConfig) -> String {
    build_cookie(config, "", 0)
}

fn build_cookie(config: &CookieConfig, value: &str, max_age: i64) -> String {
    let mut cookie = format!(
        "{}={value}; Path={}; Max-Age={max_age}; SameSite={}",
        config.name,
        config.path,
        config.same_site.as_str()
    );
    if let Some(domain) = &config.domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    if config.secure {
        cookie.push_str("; Secure");
    }
    if config.http_only {
        cookie.push_str("; HttpOnly");
    }
    cookie
}

/// Pulls the session credential out of the request's `Cookie` header.
///
/// Tolerates multiple `Cookie` headers and unrelated cookies in the same
/// header; returns the first value under the configured name.
pub fn extract_session_token(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get_all(COOKIE).iter().find_map(|header| {
        let raw = header.to_str().ok()?;
        raw.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_owned())
        })
    })
}
