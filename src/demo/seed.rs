// Sample data for the in-memory store, dated relative to the day it is built

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::Tables;
use crate::core::calendar::start_of_day_utc;
use crate::core::money::round_money;
use crate::modules::bookings::models::{Booking, BookingStatus};
use crate::modules::companies::models::Company;
use crate::modules::drivers::models::Driver;
use crate::modules::ratecards::models::RateCard;
use crate::modules::vehicles::models::{Vehicle, VehicleStatus};

const COMPANIES: [(&str, &str, &str); 5] = [
    ("cmp-001", "TechCorp", "Corporate"),
    ("cmp-002", "GlobalTrade", "Trader"),
    ("cmp-003", "FastShip", "Courier"),
    ("cmp-004", "QuickMove", "Courier"),
    ("cmp-005", "EasyLogistics", "Corporate"),
];

const DRIVERS: [(&str, &str, &str); 5] = [
    ("drv-001", "Ramesh Patil", "+91-98200-11001"),
    ("drv-002", "Suresh Kumar", "+91-98200-11002"),
    ("drv-003", "Anil Sharma", "+91-98200-11003"),
    ("drv-004", "Vijay Rao", "+91-98200-11004"),
    ("drv-005", "Manoj Singh", "+91-98200-11005"),
];

/// (id, registration, type, capacity, status)
const VEHICLES: [(&str, &str, &str, i32, VehicleStatus); 5] = [
    ("veh-001", "MH-12-AB-1234", "Truck", 120, VehicleStatus::Available),
    ("veh-002", "MH-14-CD-5678", "Truck", 100, VehicleStatus::Dispatched),
    ("veh-003", "TN-09-EF-9012", "Mini Truck", 60, VehicleStatus::Dispatched),
    ("veh-004", "KA-05-GH-3456", "Tempo", 40, VehicleStatus::Available),
    ("veh-005", "DL-07-IJ-7890", "Truck", 120, VehicleStatus::Maintenance),
];

const ROUTES: [(&str, &str, &str); 6] = [
    ("Mumbai", "Pune", "411001"),
    ("Mumbai", "Nashik", "422001"),
    ("Pune", "Bengaluru", "560001"),
    ("Chennai", "Coimbatore", "641001"),
    ("Delhi", "Jaipur", "302001"),
    ("Bengaluru", "Hyderabad", "500001"),
];

const PARCEL_TYPES: [&str; 4] = ["Standard", "Express", "Fragile", "Documents"];

/// Days of booking history
const HISTORY_DAYS: i64 = 180;
const HISTORY_BOOKINGS: usize = 220;
const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

pub(super) fn build(today: NaiveDate) -> Tables {
    let established = start_of_day_utc(today - Duration::days(365));

    let companies = COMPANIES
        .iter()
        .map(|(id, name, kind)| Company {
            id: id.to_string(),
            name: name.to_string(),
            contact_person: Some(format!("{} Desk", name)),
            phone: None,
            email: Some(format!("ops@{}.example", name.to_lowercase())),
            address: None,
            company_type: Some(kind.to_string()),
            status: "Active".to_string(),
            created_at: established,
            updated_at: established,
        })
        .collect();

    let drivers = DRIVERS
        .iter()
        .enumerate()
        .map(|(i, (id, name, phone))| Driver {
            id: id.to_string(),
            name: name.to_string(),
            phone: Some(phone.to_string()),
            license_number: Some(format!("MH{:02}2019{:07}", i + 1, 4_500_000 + i)),
            created_at: established,
        })
        .collect();

    let fleet_updated = start_of_day_utc(today - Duration::days(30));
    let vehicles = VEHICLES
        .iter()
        .enumerate()
        .map(|(i, (id, registration, kind, capacity, status))| Vehicle {
            id: id.to_string(),
            registration_number: registration.to_string(),
            vehicle_type: Some(kind.to_string()),
            capacity: Some(*capacity),
            capacity_kg: Some(Decimal::from(*capacity * 50)),
            make: Some("Tata".to_string()),
            model: None,
            year: Some(2018 + i as i32),
            current_driver_id: Some(DRIVERS[i].0.to_string()),
            status: *status,
            created_at: established,
            updated_at: fleet_updated,
            driver: None,
        })
        .collect();

    let rate_cards = COMPANIES[..3]
        .iter()
        .enumerate()
        .map(|(i, (company_id, _, _))| {
            let mut surcharges = BTreeMap::new();
            surcharges.insert("Express".to_string(), Decimal::new(150, 0));
            surcharges.insert("Fragile".to_string(), Decimal::new(75, 0));
            RateCard {
                id: format!("rc-{:03}", i + 1),
                company_id: company_id.to_string(),
                company_name: None,
                base_rate: Decimal::new(200 + 50 * i as i64, 0),
                per_article_rate: Decimal::new(60 + 10 * i as i64, 0),
                surcharges,
                effective_from: today - Duration::days(HISTORY_DAYS),
                updated_at: fleet_updated,
            }
        })
        .collect();

    Tables {
        companies,
        drivers,
        vehicles,
        bookings: bookings(today),
        rate_cards,
    }
}

fn bookings(today: NaiveDate) -> Vec<Booking> {
    (0..HISTORY_BOOKINGS).map(|i| booking(today, i)).collect()
}

/// The i-th sample booking.
///
/// Offsets walk the history window with a stride coprime to its length, so
/// every day is covered before any day repeats. Offset 0 (today) is BOOKED,
/// the last few days are IN-TRANSIT, older bookings are mostly DELIVERED.
fn booking(today: NaiveDate, i: usize) -> Booking {
    let offset = (i as i64 * 37) % HISTORY_DAYS;
    let booking_date = today - Duration::days(offset);
    let created_at = start_of_day_utc(booking_date) + Duration::hours(9 + (i % 8) as i64);

    let (origin, destination, pincode) = ROUTES[i % ROUTES.len()];
    let article_count = 1 + (i % 6) as i32;
    let subtotal = Decimal::new(250 + 75 * i64::from(article_count) + (i % 7) as i64 * 10, 0);
    let gst = round_money(subtotal * GST_RATE);

    let status = if offset == 0 {
        BookingStatus::Booked
    } else if offset <= 4 || i % 10 == 0 {
        BookingStatus::InTransit
    } else {
        BookingStatus::Delivered
    };

    let mut booking = Booking::new(
        format!("LR-{}-{:06}", booking_date.year(), 100_000 + i),
        booking_date,
    )
    .with_route(origin, destination, &format!("Consignee {}", i + 1))
    .with_amounts(subtotal, gst)
    .with_status(status);

    booking.id = format!("bkg-{:04}", i + 1);
    booking.destination_pincode = Some(pincode.to_string());
    booking.article_count = article_count;
    booking.weight = Some(Decimal::new(i64::from(article_count) * 125, 1));
    booking.created_at = created_at;
    booking.updated_at = created_at;
    booking.estimated_delivery = Some(booking_date + Duration::days(3));

    if i % 23 != 22 {
        booking.company_id = Some(COMPANIES[i % COMPANIES.len()].0.to_string());
    }
    if i % 19 != 18 {
        booking.parcel_type = Some(PARCEL_TYPES[i % PARCEL_TYPES.len()].to_string());
    }

    match status {
        BookingStatus::Booked => {
            // Half of today's counter bookings are already loaded on the first truck
            if i % 2 == 0 {
                assign(&mut booking, 0);
            }
        }
        _ => {
            assign(&mut booking, 1 + i % 3);
            let dispatched_at = created_at + Duration::hours(6);
            booking.dispatched_at = Some(dispatched_at);
            booking.updated_at = dispatched_at;
            booking.payment_status = "Paid".to_string();
        }
    }

    if status == BookingStatus::Delivered {
        let delivered_at: DateTime<Utc> = created_at + Duration::days(2);
        booking.delivered_at = Some(delivered_at);
        booking.updated_at = delivered_at;
    }

    booking
}

fn assign(booking: &mut Booking, vehicle: usize) {
    booking.assigned_vehicle_id = Some(VEHICLES[vehicle].0.to_string());
    booking.assigned_driver_id = Some(DRIVERS[vehicle].0.to_string());
}
