//! Request-level route protection for an axum router.
//!
//! ```ignore
//! let config = Arc::new(GuardConfig::new());
//! let app = Router::new()
//!     .route("/student/dashboard", get(dashboard))
//!     .layer(middleware::from_fn_with_state(config, enforce));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    config::{GuardConfig, RouteRule},
    credentials::{CookieJar, SessionState},
    decision::{Principal, Requirement},
    entry::{redirect_if_authed, require_role, require_user, unix_now, GuardRedirect},
};

/// Apply the configured rule for `path`.
///
/// # Errors
///
/// Returns the redirect that should replace the response for this path.
pub fn guard_path(
    config: &GuardConfig,
    path: &str,
    state: &impl SessionState,
    now: i64,
) -> Result<Principal, GuardRedirect> {
    match config.rule_for(path) {
        RouteRule::AuthSurface => {
            redirect_if_authed(state, config, now).map(|()| Principal::Anonymous)
        }
        RouteRule::Public => Ok(Principal::Anonymous),
        RouteRule::Protected(Requirement::AnyUser) => {
            require_user(state, config, now).map(Principal::Authenticated)
        }
        RouteRule::Protected(Requirement::AnyOf(roles)) => {
            require_role(state, &roles, config, now).map(Principal::Authenticated)
        }
    }
}

/// Middleware: redirect or pass through; allowed identities land in request extensions.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn enforce(
    State(config): State<Arc<GuardConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    match guard_path(&config, request.uri().path(), &jar, unix_now()) {
        Ok(Principal::Authenticated(identity)) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Ok(Principal::Anonymous) => next.run(request).await,
        Err(redirect) => redirect.into_response(),
    }
}
