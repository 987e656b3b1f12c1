//! Response and request header helpers

use axum::http::header::{CACHE_CONTROL, EXPIRES, HOST, PRAGMA};
use axum::http::{HeaderMap, HeaderValue};
use castbridge_core::RequestContext;

/// Headers that keep auth responses out of every cache.
pub fn no_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers
}

/// Scheme and host the client used, honouring a fronting proxy.
pub fn request_context(headers: &HeaderMap) -> RequestContext {
    let scheme = header_str(headers, "x-forwarded-proto")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("http");

    let host = header_str(headers, "x-forwarded-host")
        .or_else(|| header_str(headers, HOST.as_str()))
        .map(str::to_string);

    RequestContext::new(scheme, host)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
