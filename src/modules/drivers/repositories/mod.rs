pub mod driver_repository;

pub use driver_repository::{DriverRepository, MySqlDriverRepository};
