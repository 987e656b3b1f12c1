//! Cookies set and read by the authorization routes

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Non-empty value of the cookie `name`.
pub fn read_cookie(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name).map(Cookie::value).filter(|value| !value.is_empty()).map(str::to_string)
}

/// `HttpOnly; Secure; SameSite=Lax` cookie scoped to `/`.
pub fn session_cookie(
    name: &'static str,
    value: impl Into<String>,
    max_age_secs: u64,
) -> Cookie<'static> {
    let max_age = time::Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX));
    Cookie::build((name, value.into()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

/// Removal cookie for `name`, matching the attributes it was set with.
pub fn expired_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new(), 0);
    cookie.make_removal();
    cookie
}
