// Drivers module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::Driver;
pub use repositories::DriverRepository;
pub use services::DriverService;
