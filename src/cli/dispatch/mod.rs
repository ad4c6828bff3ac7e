//! Maps validated CLI arguments onto the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{guard, ARG_PORT};
use crate::guard::RoleRoute;
use anyhow::{Context, Result};

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let role_routes = matches
        .get_many::<RoleRoute>(guard::ARG_ROLE_ROUTE)
        .map(|routes| routes.cloned().collect())
        .unwrap_or_default();

    Ok(Action::Server(Args {
        port,
        login_path: required(matches, guard::ARG_LOGIN_PATH)?,
        forbidden_path: required(matches, guard::ARG_FORBIDDEN_PATH)?,
        student_landing: required(matches, guard::ARG_STUDENT_LANDING)?,
        admin_landing: required(matches, guard::ARG_ADMIN_LANDING)?,
        role_routes,
    }))
}
