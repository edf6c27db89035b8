mod vehicle;

pub use vehicle::{
    CreateVehicleRequest, DispatchOutcome, Vehicle, VehicleFilter, VehicleListing, VehicleStatus,
};
