//! Raw token extraction from request session state.

use axum::http::{header::COOKIE, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use tracing::debug;

use super::{claims::ClaimSet, token};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Key/value view over whatever carries session state for a request.
pub trait SessionState {
    fn get(&self, name: &str) -> Option<&str>;
}

impl SessionState for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).map(String::as_str)
    }
}

/// Cookies parsed from every `Cookie` header on a request. First occurrence wins.
#[derive(Debug, Default, Clone)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = HashMap::new();
        for value in headers.get_all(COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for pair in value.split(';') {
                let mut parts = pair.trim().splitn(2, '=');
                let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                    continue;
                };
                cookies
                    .entry(key.trim().to_string())
                    .or_insert_with(|| cookie_value(val));
            }
        }
        Self { cookies }
    }
}

/// Strip optional surrounding quotes, then percent-decode; undecodable values are kept
/// as sent.
fn cookie_value(raw: &str) -> String {
    let raw = raw.trim();
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .unwrap_or(raw);
    urlencoding::decode(unquoted).map_or_else(|_| unquoted.to_string(), |value| value.into_owned())
}

impl SessionState for CookieJar {
    fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

/// The access/refresh token pair as presented. Both are optional.
#[derive(Debug, Default)]
pub struct Credentials {
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

impl Credentials {
    /// Decode the access token for routing, collapsing any decode failure into `None`.
    #[must_use]
    pub fn access_claims(&self) -> Option<ClaimSet> {
        let raw = self.access_token.as_ref()?;
        match token::decode(raw.expose_secret()) {
            Ok(claims) => Some(claims),
            Err(err) => {
                debug!("Ignoring undecodable access token: {err}");
                None
            }
        }
    }
}

/// Project the two well-known token entries out of the session state.
#[must_use]
pub fn extract(state: &impl SessionState) -> Credentials {
    Credentials {
        access_token: lookup(state, ACCESS_TOKEN_COOKIE),
        refresh_token: lookup(state, REFRESH_TOKEN_COOKIE),
    }
}

fn lookup(state: &impl SessionState, name: &str) -> Option<SecretString> {
    state
        .get(name)
        .filter(|value| !value.is_empty())
        .map(|value| SecretString::from(value.to_string()))
}
