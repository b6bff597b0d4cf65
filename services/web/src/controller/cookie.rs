//! Session cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "nippo_session";

/// Session id presented by the client, if any.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

/// Set the session cookie on the jar. No `Max-Age`: the browser drops it on
/// close and the store expires the session server-side.
pub fn set_session_cookie(jar: CookieJar, id: String) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
