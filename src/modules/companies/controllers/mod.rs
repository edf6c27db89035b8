pub mod company_controller;

pub use company_controller::configure;
