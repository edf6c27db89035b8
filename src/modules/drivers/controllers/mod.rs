pub mod driver_controller;

pub use driver_controller::configure;
