//! # Gatehouse
//!
//! Request-time access control for a web front end. Given the cookies on an incoming
//! request, decide whether the caller may reach a path and, if not, where to send them:
//! the login page, the forbidden page, or (for callers already signed in who open the
//! login form) their landing page.
//!
//! ## Trust model
//!
//! Access tokens are decoded locally **without signature verification**. Decisions are
//! routing hints for page rendering; [`guard::Identity`] cannot be constructed or
//! deserialized outside this crate. Any state-changing operation must verify the token
//! with the identity authority that issued it.
//!
//! ## Surfaces
//!
//! - [`guard`]: codec, extractor, route table, decision engine, entrypoints,
//!   axum extractors and route middleware.
//! - [`gatehouse`]: a forward-auth HTTP service for reverse proxies.
//! - [`cli`]: argument parsing, telemetry and the server action.

pub mod cli;
pub mod gatehouse;
pub mod guard;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
