//! Guard entrypoints for route handlers.
//!
//! These are the only operations that turn a verdict into a redirect. Each reads the
//! request's cookies, decodes the access token without verification and evaluates the
//! calling surface as protected.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::{
    convert::Infallible,
    marker::PhantomData,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, error};

use super::{
    claims::Role,
    config::GuardConfig,
    credentials::{extract, CookieJar, SessionState},
    decision::{evaluate, Identity, Principal, Requirement, Verdict},
    error::Denial,
    routes::RouteClass,
};

/// A redirect that ends handling of the current request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuardRedirect {
    location: String,
}

impl GuardRedirect {
    #[must_use]
    pub fn to(location: &str) -> Self {
        Self {
            location: location.to_string(),
        }
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    fn for_denial(denial: &Denial, config: &GuardConfig) -> Self {
        debug!("Guard denied request: {denial}");
        match denial.verdict() {
            Verdict::RedirectToForbidden => Self::to(config.forbidden_path()),
            Verdict::RedirectToLogin | Verdict::Allow(_) => Self::to(config.login_path()),
        }
    }
}

impl IntoResponse for GuardRedirect {
    fn into_response(self) -> Response {
        Redirect::temporary(&self.location).into_response()
    }
}

/// Current time in epoch seconds.
#[must_use]
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}

fn authenticate(
    state: &impl SessionState,
    requirement: &Requirement,
    config: &GuardConfig,
    now: i64,
) -> Result<Identity, GuardRedirect> {
    let claims = extract(state).access_claims();
    match evaluate(claims.as_ref(), RouteClass::Protected, requirement, now) {
        Ok(Principal::Authenticated(identity)) => Ok(identity),
        Ok(Principal::Anonymous) => Err(GuardRedirect::to(config.login_path())),
        Err(denial) => Err(GuardRedirect::for_denial(&denial, config)),
    }
}

/// Require any signed-in caller.
///
/// # Errors
///
/// Redirects to the login surface when the access token is missing, undecodable or
/// expired.
pub fn require_user(
    state: &impl SessionState,
    config: &GuardConfig,
    now: i64,
) -> Result<Identity, GuardRedirect> {
    authenticate(state, &Requirement::AnyUser, config, now)
}

/// Require a signed-in caller holding one of `allowed`.
///
/// # Errors
///
/// Redirects to login for missing, undecodable or expired tokens, and to the
/// forbidden surface when the role is absent or not in `allowed`.
pub fn require_role(
    state: &impl SessionState,
    allowed: &[Role],
    config: &GuardConfig,
    now: i64,
) -> Result<Identity, GuardRedirect> {
    authenticate(state, &Requirement::any_of(allowed), config, now)
}

/// Inverse guard for login/signup forms.
///
/// # Errors
///
/// Redirects to the role's landing surface when the caller already holds a valid,
/// unexpired token with a known role.
pub fn redirect_if_authed(
    state: &impl SessionState,
    config: &GuardConfig,
    now: i64,
) -> Result<(), GuardRedirect> {
    match current_user(state, now).and_then(|identity| identity.role()) {
        Some(role) => Err(GuardRedirect::to(config.landing_for(role))),
        None => Ok(()),
    }
}

/// The signed-in caller, if any, without redirecting.
#[must_use]
pub fn current_user(state: &impl SessionState, now: i64) -> Option<Identity> {
    let claims = extract(state).access_claims()?;
    match evaluate(Some(&claims), RouteClass::Protected, &Requirement::AnyUser, now) {
        Ok(Principal::Authenticated(identity)) => Some(identity),
        Ok(Principal::Anonymous) | Err(_) => None,
    }
}

fn guard_config(parts: &Parts) -> Result<Arc<GuardConfig>, Response> {
    parts.extensions.get::<Arc<GuardConfig>>().cloned().ok_or_else(|| {
        error!("GuardConfig extension is missing from the router");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

/// Roles accepted by a [`RequireRole`] extractor.
pub trait AllowedRoles {
    const ROLES: &'static [Role];
}

/// Staff surfaces: `ADMIN` or `REVIEWER`.
pub struct StaffOnly;

impl AllowedRoles for StaffOnly {
    const ROLES: &'static [Role] = &[Role::Admin, Role::Reviewer];
}

/// Extractor form of [`require_user`].
pub struct RequireUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let config = guard_config(parts)?;
        let jar = CookieJar::from_headers(&parts.headers);
        require_user(&jar, &config, unix_now())
            .map(Self)
            .map_err(IntoResponse::into_response)
    }
}

/// Extractor form of [`require_role`], with the role set fixed by `P`.
pub struct RequireRole<P>(pub Identity, pub PhantomData<P>);

#[async_trait]
impl<S, P> FromRequestParts<S> for RequireRole<P>
where
    S: Send + Sync,
    P: AllowedRoles + Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let config = guard_config(parts)?;
        let jar = CookieJar::from_headers(&parts.headers);
        require_role(&jar, P::ROLES, &config, unix_now())
            .map(|identity| Self(identity, PhantomData))
            .map_err(IntoResponse::into_response)
    }
}

/// Extractor form of [`redirect_if_authed`].
pub struct RedirectIfAuthed;

#[async_trait]
impl<S> FromRequestParts<S> for RedirectIfAuthed
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let config = guard_config(parts)?;
        let jar = CookieJar::from_headers(&parts.headers);
        redirect_if_authed(&jar, &config, unix_now())
            .map(|()| Self)
            .map_err(IntoResponse::into_response)
    }
}

/// Extractor form of [`current_user`]; never rejects.
pub struct CurrentUser(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self(current_user(&jar, unix_now())))
    }
}
