use chrono::NaiveDate;

use crate::utils::time::trailing_days;

use super::entities::{ActivityKind, ActivityRecord};

/// Records logged on one calendar day, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySection {
    pub day: NaiveDate,
    pub items: Vec<ActivityRecord>,
}

/// Sums the values of `kind` logged on `day`. An empty match set sums to 0.
pub fn sum_for_day(records: &[ActivityRecord], kind: ActivityKind, day: NaiveDate) -> f64 {
    records
        .iter()
        .filter(|record| record.date_str == day && record.kind == kind)
        .map(|record| record.value)
        .sum()
}

/// Groups records into per-day sections for the `days` calendar days ending
/// at `reference`, most recent day first. Days without any records are
/// dropped and items within a day are ordered by logging time descending.
pub fn trailing_day_sections(
    records: &[ActivityRecord],
    days: u32,
    reference: NaiveDate,
) -> Vec<DaySection> {
    trailing_days(reference, days)
        .filter_map(|day| {
            let mut items = records
                .iter()
                .filter(|record| record.date_str == day)
                .cloned()
                .collect::<Vec<_>>();
            if items.is_empty() {
                return None;
            }
            items.sort_by(|a, b| b.time.cmp(&a.time));
            Some(DaySection { day, items })
        })
        .collect()
}
