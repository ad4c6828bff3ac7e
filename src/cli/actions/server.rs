use crate::{
    cli::telemetry,
    gatehouse,
    guard::{GuardConfig, RoleRoute},
};
use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub login_path: String,
    pub forbidden_path: String,
    pub student_landing: String,
    pub admin_landing: String,
    pub role_routes: Vec<RoleRoute>,
}

impl Args {
    #[must_use]
    pub fn guard_config(&self) -> GuardConfig {
        GuardConfig::new()
            .with_login_path(self.login_path.clone())
            .with_forbidden_path(self.forbidden_path.clone())
            .with_student_landing(self.student_landing.clone())
            .with_admin_landing(self.admin_landing.clone())
            .with_role_routes(self.role_routes.clone())
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = args.guard_config();

    debug!("Guard config: {:?}", config);

    let result = gatehouse::new(args.port, config).await;

    telemetry::shutdown_tracer();

    result
}
