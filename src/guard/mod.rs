//! Request-time access control.
//!
//! Tokens are read from the `access_token`/`refresh_token` cookies and decoded
//! **without** signature verification. Every decision made here is a routing hint: it
//! picks a page or a redirect. Anything that changes state must have the token verified
//! by the identity authority that issued it.

pub mod claims;
pub mod config;
pub mod credentials;
pub mod decision;
pub mod entry;
pub mod error;
pub mod layer;
pub mod routes;
pub mod token;

pub use self::claims::{ClaimSet, Role};
pub use self::config::{GuardConfig, RoleRoute, RouteRule};
pub use self::credentials::{extract, CookieJar, Credentials, SessionState};
pub use self::decision::{decide, evaluate, Identity, Principal, Requirement, Verdict};
pub use self::entry::{
    current_user, redirect_if_authed, require_role, require_user, AllowedRoles, CurrentUser,
    GuardRedirect, RedirectIfAuthed, RequireRole, RequireUser, StaffOnly,
};
pub use self::error::{DecodeError, Denial};
pub use self::layer::{enforce, guard_path};
pub use self::routes::{classify, normalize_path, RouteClass};
pub use self::token::decode;
