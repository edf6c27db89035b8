use chrono::{DateTime, NaiveDate, Utc};

use super::booking::{Booking, BookingStatus};

/// Predicate over the bookings table.
///
/// Every field narrows the result; the default filter matches everything.
/// The MySQL repository turns it into a WHERE clause, the in-memory store
/// evaluates [`BookingFilter::matches`] directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    /// booking_date >= date_from
    pub date_from: Option<NaiveDate>,
    /// booking_date <= date_to
    pub date_to: Option<NaiveDate>,
    /// booking_date < date_before
    pub date_before: Option<NaiveDate>,
    pub company_id: Option<String>,
    /// Exact match on the joined company name
    pub company_name: Option<String>,
    /// status IN (...); empty means any status
    pub statuses: Vec<BookingStatus>,
    /// Case-insensitive substring of the LR number
    pub lr_number_like: Option<String>,
    pub vehicle_id: Option<String>,
    /// Only bookings with a vehicle assigned
    pub has_vehicle: bool,
    /// updated_at < updated_before
    pub updated_before: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl BookingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn date_before(mut self, date: NaiveDate) -> Self {
        self.date_before = Some(date);
        self
    }

    /// Restrict to one calendar day
    pub fn on(self, date: NaiveDate) -> Self {
        self.date_from(date).date_to(date)
    }

    pub fn company_id(mut self, id: impl Into<String>) -> Self {
        self.company_id = Some(id.into());
        self
    }

    pub fn company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    pub fn status(mut self, status: BookingStatus) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn lr_number_like(mut self, fragment: impl Into<String>) -> Self {
        self.lr_number_like = Some(fragment.into());
        self
    }

    pub fn vehicle_id(mut self, id: impl Into<String>) -> Self {
        self.vehicle_id = Some(id.into());
        self
    }

    pub fn with_vehicle(mut self) -> Self {
        self.has_vehicle = true;
        self
    }

    pub fn updated_before(mut self, instant: DateTime<Utc>) -> Self {
        self.updated_before = Some(instant);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate the predicate against a booking (limit is not considered)
    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(from) = self.date_from {
            if booking.booking_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if booking.booking_date > to {
                return false;
            }
        }
        if let Some(before) = self.date_before {
            if booking.booking_date >= before {
                return false;
            }
        }
        if let Some(company_id) = &self.company_id {
            if booking.company_id.as_deref() != Some(company_id.as_str()) {
                return false;
            }
        }
        if let Some(name) = &self.company_name {
            if booking.company.as_ref().map(|c| c.name.as_str()) != Some(name.as_str()) {
                return false;
            }
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&booking.status) {
            return false;
        }
        if let Some(fragment) = &self.lr_number_like {
            if !booking
                .lr_number
                .to_lowercase()
                .contains(&fragment.to_lowercase())
            {
                return false;
            }
        }
        if let Some(vehicle_id) = &self.vehicle_id {
            if booking.assigned_vehicle_id.as_deref() != Some(vehicle_id.as_str()) {
                return false;
            }
        }
        if self.has_vehicle && booking.assigned_vehicle_id.is_none() {
            return false;
        }
        if let Some(instant) = self.updated_before {
            if booking.updated_at >= instant {
                return false;
            }
        }
        true
    }
}
