// Vehicles module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Vehicle, VehicleStatus};
pub use repositories::VehicleRepository;
pub use services::VehicleService;
