use thiserror::Error;

use super::claims::Role;

/// Reasons a compact credential could not be turned into a claim set.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid token format: expected 3 segments, found {0}")]
    Segments(usize),
    #[error("invalid base64url encoding")]
    Base64,
    #[error("payload is not valid utf-8")]
    Utf8,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("payload is not a json object")]
    NotAnObject,
}

/// Why a request was turned away.
///
/// Never surfaced to the caller as a failure; each variant resolves to a redirect
/// through [`Denial::verdict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("no usable access token")]
    Unauthenticated,
    #[error("token expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },
    #[error("role {role:?} not permitted")]
    RoleMismatch { role: Option<Role> },
}
