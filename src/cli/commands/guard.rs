use crate::guard::RoleRoute;
use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_LOGIN_PATH: &str = "login-path";
pub const ARG_FORBIDDEN_PATH: &str = "forbidden-path";
pub const ARG_STUDENT_LANDING: &str = "student-landing";
pub const ARG_ADMIN_LANDING: &str = "admin-landing";
pub const ARG_ROLE_ROUTE: &str = "role-route";

/// Redirect targets must stay on this site: absolute path, not protocol-relative.
#[must_use]
pub fn validator_site_path() -> ValueParser {
    ValueParser::from(move |path: &str| -> std::result::Result<String, String> {
        if path.starts_with('/') && !path.starts_with("//") {
            Ok(path.to_string())
        } else {
            Err(format!("expected an absolute path such as /login, got: {path}"))
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_LOGIN_PATH)
                .long(ARG_LOGIN_PATH)
                .help("Redirect target for unauthenticated or expired sessions")
                .env("GATEHOUSE_LOGIN_PATH")
                .default_value("/login")
                .value_parser(validator_site_path()),
        )
        .arg(
            Arg::new(ARG_FORBIDDEN_PATH)
                .long(ARG_FORBIDDEN_PATH)
                .help("Redirect target for signed-in callers lacking the required role")
                .env("GATEHOUSE_FORBIDDEN_PATH")
                .default_value("/403")
                .value_parser(validator_site_path()),
        )
        .arg(
            Arg::new(ARG_STUDENT_LANDING)
                .long(ARG_STUDENT_LANDING)
                .help("Landing page for signed-in STUDENT callers")
                .env("GATEHOUSE_STUDENT_LANDING")
                .default_value("/student/dashboard")
                .value_parser(validator_site_path()),
        )
        .arg(
            Arg::new(ARG_ADMIN_LANDING)
                .long(ARG_ADMIN_LANDING)
                .help("Landing page for signed-in ADMIN and REVIEWER callers")
                .env("GATEHOUSE_ADMIN_LANDING")
                .default_value("/admin")
                .value_parser(validator_site_path()),
        )
        .arg(
            Arg::new(ARG_ROLE_ROUTE)
                .long(ARG_ROLE_ROUTE)
                .help("Role-gated route, PREFIX=ROLE[,ROLE]; repeat or separate with ';'")
                .env("GATEHOUSE_ROLE_ROUTES")
                .default_value("/admin=ADMIN,REVIEWER")
                .value_delimiter(';')
                .action(ArgAction::Append)
                .value_parser(|route: &str| route.parse::<RoleRoute>()),
        )
}
