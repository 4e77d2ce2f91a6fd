//! Business logic services.
//!
//! # Services
//!
//! - `email` - Customer notifications (SMTP via lettre, or the log)
//! - `fulfillment` - Matches new robots to pending orders
//! - `orders` - Order placement
//! - `report` - Weekly production report
//! - `robots` - Robot registration from the production feed

pub mod email;
pub mod fulfillment;
pub mod orders;
pub mod report;
pub mod robots;

pub use email::{
    EmailError, EmailService, LogNotifier, Notification, Notifier, notifier_from_config,
};
pub use fulfillment::{FulfillmentOutcome, OrderFulfillment};
pub use orders::{OrderError, place_order};
pub use report::{GeneratedReport, ReportError, WeeklySummary, generate_report, weekly_summary};
pub use robots::{RegistrationError, register_robot, validate_new_robot_request};
