//! Activity API binary
//!
//! ```bash
//! DATABASE_URL=postgres://... JWT_SECRET=... cargo run -p activity-api
//! ```
//!
//! Everything is read from the environment; a `.env` file in the working
//! directory is loaded first when present.

use std::process::ExitCode;

use activity_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Logging format depends on APP_ENV, so configuration comes first
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        service = %config.app.name,
        env = ?config.app.env,
        address = %config.api.address(),
        seeding = config.admin.password.is_some(),
        "Starting activity reporting API"
    );

    match activity_api::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, code = e.error_code(), "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}
