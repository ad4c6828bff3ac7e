//! Claim schema carried in the payload segment of an access token.

use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Admin,
    Reviewer,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Admin => "ADMIN",
            Self::Reviewer => "REVIEWER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(Self::Student),
            "ADMIN" => Ok(Self::Admin),
            "REVIEWER" => Ok(Self::Reviewer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Decoded, unverified token payload. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl ClaimSet {
    /// Expired means `exp` is strictly before `now`; a missing `exp` never expires.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp < now)
    }
}

// Roles outside the known set are kept as "no role" instead of failing the decode.
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_names() {
        for role in [Role::Student, Role::Admin, Role::Reviewer] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
            assert_eq!(
                serde_json::to_string(&role).ok(),
                Some(format!("\"{role}\""))
            );
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn unknown_role_is_absent() {
        let claims: ClaimSet = serde_json::from_str(r#"{"role":"GUEST","sub":"u1"}"#).unwrap();
        assert_eq!(claims.role, None);
        assert_eq!(claims.sub.as_deref(), Some("u1"));
    }

    #[test]
    fn null_fields_are_absent() {
        let claims: ClaimSet = serde_json::from_str(r#"{"role":null,"exp":null}"#).unwrap();
        assert_eq!(claims, ClaimSet::default());
    }

    #[test]
    fn expiry_is_half_open() {
        let claims = ClaimSet {
            exp: Some(100),
            ..ClaimSet::default()
        };
        assert!(claims.is_expired(101));
        assert!(!claims.is_expired(100));
        assert!(!claims.is_expired(99));
        assert!(!ClaimSet::default().is_expired(i64::MAX));
    }

    #[test]
    fn zero_expiry_counts_as_expired() {
        let claims: ClaimSet = serde_json::from_str(r#"{"sub":"s-1","exp":0}"#).unwrap();
        assert_eq!(claims.exp, Some(0));
        assert!(claims.is_expired(1));
    }
}
