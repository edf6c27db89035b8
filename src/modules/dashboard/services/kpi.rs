// Dashboard arithmetic
//
// growth_rate follows the rules the dashboard has always shown:
//   previous = 0, current = 0  ->   0
//   previous = 0, current > 0  -> 100
//   otherwise                  -> round((current - previous) / previous * 100)
// where halves round toward +infinity.

use chrono::{Datelike, Duration, NaiveDate};

use crate::core::calendar::{sunday_index, weekday_label, WEEKDAY_LABELS};
use crate::modules::bookings::models::{Booking, BookingStatus};
use crate::modules::dashboard::models::{ChartSeries, StatusOverview};

/// Companies shown before the remainder is folded into "Others"
pub const COMPANY_DISTRIBUTION_TOP: usize = 5;

pub const OTHERS_LABEL: &str = "Others";

/// Day-over-day growth in whole percent
pub fn growth_rate(current: i64, previous: i64) -> i64 {
    if previous == 0 {
        return if current > 0 { 100 } else { 0 };
    }
    let change = (current - previous) as f64 / previous as f64 * 100.0;
    (change + 0.5).floor() as i64
}

/// BOOKED / IN-TRANSIT / DELIVERED counts; other states are ignored
pub fn status_overview(bookings: &[Booking]) -> StatusOverview {
    bookings
        .iter()
        .fold(StatusOverview::default(), |mut overview, booking| {
            match booking.status {
                BookingStatus::Booked => overview.booked += 1,
                BookingStatus::InTransit => overview.in_transit += 1,
                BookingStatus::Delivered => overview.delivered += 1,
                _ => {}
            }
            overview
        })
}

/// Seven Sunday-first buckets keyed by each booking's own weekday
pub fn weekday_trend(bookings: &[Booking]) -> ChartSeries {
    let mut counts = [0i64; 7];
    for booking in bookings {
        counts[sunday_index(booking.booking_date)] += 1;
    }

    ChartSeries {
        labels: WEEKDAY_LABELS.iter().map(|l| l.to_string()).collect(),
        values: counts.to_vec(),
    }
}

/// One bucket per calendar day over the `days` days ending at `end`, oldest first,
/// each labelled with its short weekday
pub fn daily_trend(bookings: &[Booking], end: NaiveDate, days: u32) -> ChartSeries {
    let start = end - Duration::days(i64::from(days.saturating_sub(1)));
    let mut series = ChartSeries::default();

    for offset in 0..days {
        let day = start + Duration::days(i64::from(offset));
        let count = bookings.iter().filter(|b| b.booking_date == day).count() as i64;
        series.push(weekday_label(day.weekday()), count);
    }

    series
}

/// Largest `top` groups in descending order, the rest summed into "Others".
/// "Others" only appears when there are more than `top` groups.
pub fn top_with_others(mut counts: Vec<(String, i64)>, top: usize) -> ChartSeries {
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut series = ChartSeries::default();
    let rest: i64 = counts.iter().skip(top).map(|(_, count)| count).sum();
    let overflow = counts.len() > top;

    for (label, count) in counts.into_iter().take(top) {
        series.push(label, count);
    }
    if overflow {
        series.push(OTHERS_LABEL, rest);
    }

    series
}
