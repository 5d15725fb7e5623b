use chrono::{DateTime, Days, Local, NaiveDate, Utc};

/// This is the standard way of assigning an instant to a day bucket in
/// daylog: truncation to the calendar day in the local time zone.
pub fn local_day(time: DateTime<Utc>) -> NaiveDate {
    time.with_timezone(&Local).date_naive()
}

/// The `days` calendar days ending at `reference`, newest first. Windows
/// reaching past the start of the calendar end there instead of failing.
pub fn trailing_days(reference: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..days).map_while(move |offset| reference.checked_sub_days(Days::new(offset as u64)))
}
