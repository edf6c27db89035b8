mod booking;
mod booking_filter;

pub use booking::{
    Booking, BookingPatch, BookingStatus, CompanyRef, CreateBookingRequest, DriverRef,
    UpdateBookingRequest, VehicleRef,
};
pub use booking_filter::BookingFilter;
