use axum::{
    body::Body,
    http::{HeaderValue, Request, Response, header},
    middleware::Next,
};

const STATIC_CACHE: &str = "public, max-age=31536000, immutable";
const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

fn is_static(path: &str) -> bool {
    path.starts_with("/static/") || path == "/favicon.ico"
}

/// Embedded assets are cached for a year. Pages, uploads and probes are never cached.
pub async fn cache_control_middleware(req: Request<Body>, next: Next) -> Response<Body> {
    let cacheable = is_static(req.uri().path());
    let mut response = next.run(req).await;

    let cacheable = cacheable && response.status().is_success();
    let headers = response.headers_mut();

    if cacheable {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(STATIC_CACHE));
    } else {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    }

    response
}
