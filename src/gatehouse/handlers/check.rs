//! Forward-auth endpoint: a reverse proxy asks whether the original request may pass.
//!
//! The answer is a routing decision only. No identity headers are returned, so upstream
//! services cannot mistake an unverified token for an authenticated caller.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::guard::{entry::unix_now, guard_path, normalize_path, CookieJar, GuardConfig};

pub const X_FORWARDED_URI: &str = "x-forwarded-uri";
pub const X_ORIGINAL_URI: &str = "x-original-uri";

#[utoipa::path(
    get,
    path = "/v1/guard/check",
    params(
        ("X-Forwarded-Uri" = Option<String>, Header, description = "Original request path (Traefik)"),
        ("X-Original-URI" = Option<String>, Header, description = "Original request path (nginx)")
    ),
    responses(
        (status = 204, description = "Request may proceed"),
        (status = 307, description = "Redirect to login, forbidden or landing surface"),
        (status = 400, description = "No forwarded path header, or a path that cannot be decoded")
    ),
    tag = "guard"
)]
pub async fn check(headers: HeaderMap, config: Extension<Arc<GuardConfig>>) -> Response {
    let Some(path) = forwarded_path(&headers) else {
        return (StatusCode::BAD_REQUEST, "Missing forwarded path").into_response();
    };
    // Decide on the path the upstream will route, not on how the client spelled it.
    let Some(path) = normalize_path(&path) else {
        return (StatusCode::BAD_REQUEST, "Undecodable forwarded path").into_response();
    };

    let jar = CookieJar::from_headers(&headers);
    match guard_path(&config, &path, &jar, unix_now()) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(redirect) => {
            debug!("Redirecting {} to {}", path, redirect.location());
            redirect.into_response()
        }
    }
}

/// Path of the original request, without query string or fragment.
fn forwarded_path(headers: &HeaderMap) -> Option<String> {
    [X_FORWARDED_URI, X_ORIGINAL_URI]
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok())
        .map(|uri| uri.split(['?', '#']).next().unwrap_or_default())
        .find(|path| path.starts_with('/'))
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_path_strips_query() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_URI,
            HeaderValue::from_static("/student/blocks?page=2#top"),
        );
        assert_eq!(forwarded_path(&headers).as_deref(), Some("/student/blocks"));
    }

    #[test]
    fn forwarded_path_falls_back_to_original_uri() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_URI, HeaderValue::from_static("not-a-path"));
        headers.insert(X_ORIGINAL_URI, HeaderValue::from_static("/admin"));
        assert_eq!(forwarded_path(&headers).as_deref(), Some("/admin"));
    }

    #[test]
    fn forwarded_path_missing() {
        assert_eq!(forwarded_path(&HeaderMap::new()), None);
    }
}
