use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

const COOKIE_NAME: &str = "flash";

/// One-request notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

pub fn success(jar: CookieJar, message: &str) -> CookieJar {
    set(jar, Level::Success, message)
}

pub fn error(jar: CookieJar, message: &str) -> CookieJar {
    set(jar, Level::Error, message)
}

/// Flash + redirect for code paths that no longer hold the request jar.
pub fn error_redirect(message: &str, to: &str) -> Response {
    (error(CookieJar::new(), message), Redirect::to(to)).into_response()
}

fn set(jar: CookieJar, level: Level, message: &str) -> CookieJar {
    let flash = Flash {
        level,
        message: message.to_string(),
    };
    // Hex keeps the JSON payload within the cookie-value character set.
    let value = hex::encode(serde_json::to_vec(&flash).unwrap_or_default());
    let cookie = Cookie::build((COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Take the pending flash, if any, clearing its cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let flash = jar
        .get(COOKIE_NAME)
        .and_then(|c| from_cookie_value(c.value()));
    let removal = Cookie::build((COOKIE_NAME, "")).path("/").build();
    (jar.remove(removal), flash)
}

pub fn from_cookie_value(value: &str) -> Option<Flash> {
    let bytes = hex::decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}
