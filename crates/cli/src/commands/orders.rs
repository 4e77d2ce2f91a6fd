//! Order inspection commands.

use r4c_server::db::OrderRepository;

use super::{CliError, connect};

/// Print every order still waiting for a robot.
///
/// # Errors
///
/// Returns error if the database cannot be read.
#[allow(clippy::print_stdout)]
pub async fn pending() -> Result<(), CliError> {
    let (_, pool) = connect().await?;
    let orders = OrderRepository::new(&pool).list_pending().await?;

    if orders.is_empty() {
        println!("No pending orders.");
        return Ok(());
    }

    println!("{:<8} {:<10} EMAIL", "ORDER", "SERIAL");
    for order in &orders {
        println!(
            "{:<8} {:<10} {}",
            order.id.to_string(),
            order.robot_serial.as_str(),
            order.email
        );
    }
    println!("\n{} pending order(s)", orders.len());
    Ok(())
}
