use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use crate::core::{AppError, Result};

/// Short weekday labels in Sunday-first order
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Current calendar day on the server's local clock
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Midnight of `date` on the server's local clock, expressed in UTC.
/// Falls back to UTC midnight when the local midnight does not exist (DST gaps).
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Sunday-first bucket index (Sun = 0 .. Sat = 6)
pub fn sunday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    WEEKDAY_LABELS[weekday.num_days_from_sunday() as usize]
}

/// `YYYY-MM` bucket key
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Parse an optional `YYYY-MM-DD` query value. Blank values count as absent.
pub fn parse_query_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::validation(format!(
                    "Invalid {} format: '{}'. Expected YYYY-MM-DD",
                    field, raw
                ))
            }),
    }
}
