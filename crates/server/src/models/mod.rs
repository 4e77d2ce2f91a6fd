//! Plain data records returned by the repositories.
//!
//! Nothing here holds a database connection; records are snapshots taken at
//! query time.

pub mod customer;
pub mod order;
pub mod robot;

pub use customer::Customer;
pub use order::{Order, PendingOrder};
pub use robot::Robot;
