pub mod driver_service;

pub use driver_service::DriverService;
