//! Robot registration command.

use r4c_server::services::{notifier_from_config, register_robot};
use r4c_server::state::AppState;

use super::{CliError, connect};

/// Register a robot the same way the production feed does.
///
/// The arguments are assembled into the JSON payload the HTTP endpoint
/// accepts, so validation and order fulfillment behave identically.
///
/// # Errors
///
/// Returns error if the robot is rejected or cannot be stored.
#[allow(clippy::print_stdout)]
pub async fn add(model: &str, version: &str, created: &str) -> Result<(), CliError> {
    let (config, pool) = connect().await?;
    let notifier = notifier_from_config(&config.email)?;
    let state = AppState::new(config, pool, notifier);

    let body = serde_json::json!({
        "model": model,
        "version": version,
        "created": created,
    })
    .to_string();

    let robot = register_robot(state.robots(), body.as_bytes()).await?;

    println!("Registered robot {} (id {})", robot.serial, robot.id);
    Ok(())
}
