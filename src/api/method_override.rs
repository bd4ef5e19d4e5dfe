//! Lets HTML forms reach `PUT`, `DELETE` and `PATCH` routes.
//!
//! A `POST` whose query string or urlencoded body carries `_method=<verb>` is
//! dispatched as that verb. This has to run before routing, so the router
//! installs it on an outer wrapper rather than with `Router::layer`.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AppError;

const OVERRIDE_FIELD: &str = "_method";

/// Same ceiling as axum's default body limit, so the override never refuses a
/// form that `axum::Form` would have accepted.
const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

fn parse_override(value: &str) -> Option<Method> {
    match value.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        "PATCH" => Some(Method::PATCH),
        _ => None,
    }
}

fn override_in(pairs: &[u8]) -> Option<Method> {
    url::form_urlencoded::parse(pairs)
        .find(|(key, _)| key == OVERRIDE_FIELD)
        .and_then(|(_, value)| parse_override(&value))
}

fn is_urlencoded(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

pub async fn method_override(mut req: Request, next: Next) -> Response {
    if req.method() != Method::POST {
        return next.run(req).await;
    }

    if let Some(method) = req.uri().query().and_then(|q| override_in(q.as_bytes())) {
        *req.method_mut() = method;
        return next.run(req).await;
    }

    if !is_urlencoded(&req) {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();
    let bytes = match to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return AppError::validation(format!("Failed to read form body: {e}")).into_response();
        }
    };

    if let Some(method) = override_in(&bytes) {
        parts.method = method;
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
