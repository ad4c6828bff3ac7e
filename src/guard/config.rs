//! Redirect targets and per-path guard rules.

use std::str::FromStr;

use super::{
    claims::Role,
    decision::Requirement,
    routes::{classify, RouteClass},
};

const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_FORBIDDEN_PATH: &str = "/403";
const DEFAULT_STUDENT_LANDING: &str = "/student/dashboard";
const DEFAULT_ADMIN_LANDING: &str = "/admin";
const DEFAULT_AUTH_SURFACES: [&str; 2] = ["/login", "/signup"];

/// A path prefix whose subtree requires one of `roles`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleRoute {
    prefix: String,
    roles: Vec<Role>,
}

impl RoleRoute {
    #[must_use]
    pub fn new(prefix: impl Into<String>, roles: &[Role]) -> Self {
        Self {
            prefix: prefix.into(),
            roles: roles.to_vec(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Match on whole path segments: `/admin` covers `/admin/x` but not `/administrator`.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let prefix = self.prefix.trim_end_matches('/');
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Parses `PREFIX=ROLE[,ROLE...]`, e.g. `/admin=ADMIN,REVIEWER`.
impl FromStr for RoleRoute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, roles) = s
            .split_once('=')
            .ok_or_else(|| format!("expected PREFIX=ROLE[,ROLE], got: {s}"))?;
        let prefix = prefix.trim();
        if !prefix.starts_with('/') {
            return Err(format!("route prefix must start with '/': {prefix}"));
        }
        let roles = roles
            .split(',')
            .map(|role| role.trim().to_uppercase().parse::<Role>())
            .collect::<Result<Vec<_>, _>>()?;
        if roles.is_empty() {
            return Err(format!("no roles given for {prefix}"));
        }
        Ok(Self::new(prefix, &roles))
    }
}

/// How the route middleware treats a given path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RouteRule {
    /// Login/signup forms: bounce callers who are already signed in.
    AuthSurface,
    Public,
    Protected(Requirement),
}

#[derive(Clone, Debug)]
pub struct GuardConfig {
    login_path: String,
    forbidden_path: String,
    student_landing: String,
    admin_landing: String,
    auth_surfaces: Vec<String>,
    role_routes: Vec<RoleRoute>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            forbidden_path: DEFAULT_FORBIDDEN_PATH.to_string(),
            student_landing: DEFAULT_STUDENT_LANDING.to_string(),
            admin_landing: DEFAULT_ADMIN_LANDING.to_string(),
            auth_surfaces: DEFAULT_AUTH_SURFACES.map(ToString::to_string).to_vec(),
            role_routes: vec![RoleRoute::new("/admin", &[Role::Admin, Role::Reviewer])],
        }
    }
}

impl GuardConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_login_path(mut self, path: String) -> Self {
        self.login_path = path;
        self
    }

    #[must_use]
    pub fn with_forbidden_path(mut self, path: String) -> Self {
        self.forbidden_path = path;
        self
    }

    #[must_use]
    pub fn with_student_landing(mut self, path: String) -> Self {
        self.student_landing = path;
        self
    }

    #[must_use]
    pub fn with_admin_landing(mut self, path: String) -> Self {
        self.admin_landing = path;
        self
    }

    #[must_use]
    pub fn with_role_routes(mut self, routes: Vec<RoleRoute>) -> Self {
        self.role_routes = routes;
        self
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn forbidden_path(&self) -> &str {
        &self.forbidden_path
    }

    #[must_use]
    pub fn role_routes(&self) -> &[RoleRoute] {
        &self.role_routes
    }

    /// Landing surface for an already signed-in role.
    #[must_use]
    pub fn landing_for(&self, role: Role) -> &str {
        match role {
            Role::Student => &self.student_landing,
            Role::Admin | Role::Reviewer => &self.admin_landing,
        }
    }

    /// Resolve the guard rule for a request path. The configured login path and the
    /// auth surfaces win over everything; the forbidden path and the public table are
    /// open; the first matching role route wins over the plain signed-in requirement.
    #[must_use]
    pub fn rule_for(&self, path: &str) -> RouteRule {
        if path == self.login_path
            || self.auth_surfaces.iter().any(|surface| surface == path)
        {
            return RouteRule::AuthSurface;
        }
        if path == self.forbidden_path || classify(path) == RouteClass::Public {
            return RouteRule::Public;
        }
        self.role_routes
            .iter()
            .find(|route| route.matches(path))
            .map_or(RouteRule::Protected(Requirement::AnyUser), |route| {
                RouteRule::Protected(Requirement::any_of(route.roles()))
            })
    }
}
