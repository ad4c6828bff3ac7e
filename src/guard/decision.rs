//! Access decisions: one verdict per request, computed from already-extracted inputs.
//!
//! Nothing here performs I/O or reads the clock; `now` is supplied by the caller in
//! epoch seconds.

use super::{
    claims::{ClaimSet, Role},
    error::Denial,
    routes::RouteClass,
};

/// What the guarded surface demands of the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Requirement {
    AnyUser,
    AnyOf(Vec<Role>),
}

impl Requirement {
    #[must_use]
    pub fn any_of(roles: &[Role]) -> Self {
        Self::AnyOf(roles.to_vec())
    }

    fn permits(&self, role: Option<Role>) -> bool {
        match self {
            Self::AnyUser => true,
            Self::AnyOf(allowed) => role.is_some_and(|role| allowed.contains(&role)),
        }
    }
}

/// The principal behind an allowed request, derived from unverified claims.
///
/// Good enough to choose what to render, never enough to authorize a mutation. It can
/// only be produced by this module and cannot be serialized back out.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    subject: Option<String>,
    role: Option<Role>,
}

impl Identity {
    fn from_claims(claims: &ClaimSet) -> Self {
        Self {
            subject: claims.sub.clone(),
            role: claims.role,
        }
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Principal {
    Anonymous,
    Authenticated(Identity),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Allow(Principal),
    RedirectToLogin,
    RedirectToForbidden,
}

impl Denial {
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Unauthenticated | Self::Expired { .. } => Verdict::RedirectToLogin,
            Self::RoleMismatch { .. } => Verdict::RedirectToForbidden,
        }
    }
}

/// Evaluate a request. Checks run in order and the first failing one wins:
/// public route, credential presence, expiry, role membership.
///
/// # Errors
///
/// Returns the [`Denial`] explaining why a protected route was refused.
pub fn evaluate(
    claims: Option<&ClaimSet>,
    class: RouteClass,
    requirement: &Requirement,
    now: i64,
) -> Result<Principal, Denial> {
    if class == RouteClass::Public {
        return Ok(Principal::Anonymous);
    }

    let claims = claims.ok_or(Denial::Unauthenticated)?;

    if let Some(exp) = claims.exp.filter(|_| claims.is_expired(now)) {
        return Err(Denial::Expired { exp, now });
    }

    if !requirement.permits(claims.role) {
        return Err(Denial::RoleMismatch { role: claims.role });
    }

    Ok(Principal::Authenticated(Identity::from_claims(claims)))
}

#[must_use]
pub fn decide(
    claims: Option<&ClaimSet>,
    class: RouteClass,
    requirement: &Requirement,
    now: i64,
) -> Verdict {
    match evaluate(claims, class, requirement, now) {
        Ok(principal) => Verdict::Allow(principal),
        Err(denial) => denial.verdict(),
    }
}
