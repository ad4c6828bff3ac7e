//! Static public/protected classification of request paths.

/// Paths reachable without any credential.
pub const PUBLIC_ROUTES: [&str; 9] = [
    "/login",
    "/signup",
    "/",
    "/403",
    "/legal",
    "/contact",
    "/_next",
    "/static",
    "/api/auth",
];

/// Framework asset and auth-proxy namespaces; anything underneath them is public.
pub const PUBLIC_PREFIXES: [&str; 3] = ["/_next", "/static", "/api/auth"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RouteClass {
    Public,
    Protected,
}

#[must_use]
pub fn classify(path: &str) -> RouteClass {
    if PUBLIC_ROUTES.contains(&path)
        || PUBLIC_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
    {
        RouteClass::Public
    } else {
        RouteClass::Protected
    }
}

/// Canonical form of a path as a web server would route it: percent-escapes decoded,
/// empty and `.` segments dropped, `..` resolved. Returns `None` for relative paths or
/// escapes that do not decode to UTF-8.
#[must_use]
pub fn normalize_path(raw: &str) -> Option<String> {
    if !raw.starts_with('/') {
        return None;
    }
    let decoded = urlencoding::decode(raw).ok()?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    Some(format!("/{}", segments.join("/")))
}
