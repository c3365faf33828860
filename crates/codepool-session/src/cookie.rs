//! Cookie builder for the admin session.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the admin session token.
pub const ADMIN_SESSION_COOKIE: &str = "codepool_admin_session";

/// The session cookie is only sent to admin routes.
pub const ADMIN_SESSION_PATH: &str = "/admin";

/// Set the admin session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use codepool_session::cookie::{set_session_cookie, ADMIN_SESSION_COOKIE};
///
/// let jar = set_session_cookie(CookieJar::new(), "token".to_string(), 1800, true);
/// let cookie = jar.get(ADMIN_SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/admin"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(1800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, ttl_secs: u64, secure: bool) -> CookieJar {
    let max_age = Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX));
    let cookie = Cookie::build((ADMIN_SESSION_COOKIE, value))
        .path(ADMIN_SESSION_PATH)
        .max_age(max_age)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use codepool_session::cookie::{clear_session_cookie, set_session_cookie, ADMIN_SESSION_COOKIE};
///
/// let jar = set_session_cookie(CookieJar::new(), "token".to_string(), 1800, false);
/// let jar = clear_session_cookie(jar, false);
/// let cookie = jar.get(ADMIN_SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, secure: bool) -> CookieJar {
    let cookie = Cookie::build((ADMIN_SESSION_COOKIE, ""))
        .path(ADMIN_SESSION_PATH)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
