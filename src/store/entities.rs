use std::fmt::Display;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use clap::ValueEnum;
use serde::Deserialize;
use serde::Serialize;

use crate::utils::time::local_day;

/// Category of a logged activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Water,
    Steps,
    Sleep,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 3] = [
        ActivityKind::Water,
        ActivityKind::Steps,
        ActivityKind::Sleep,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Water => "Water Intake",
            ActivityKind::Steps => "Steps Walked",
            ActivityKind::Sleep => "Sleep Hours",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ActivityKind::Water => "glasses",
            ActivityKind::Steps => "steps",
            ActivityKind::Sleep => "hours",
        }
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Water => write!(f, "water"),
            ActivityKind::Steps => write!(f, "steps"),
            ActivityKind::Sleep => write!(f, "sleep"),
        }
    }
}

/// One logged activity event. Records are immutable after creation and only
/// disappear by being absent from a later snapshot.
///
/// The serialized field names (`type`, `dateStr`) are the persisted snapshot
/// format and must not change without bumping the snapshot version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub value: f64,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Local-calendar-day bucket of [ActivityRecord::time].
    #[serde(rename = "dateStr")]
    pub date_str: NaiveDate,
}

impl ActivityRecord {
    /// Constructs a record at `now`. The id is derived from the creation
    /// timestamp, the day bucket from the local calendar day of `now`.
    pub fn new(kind: ActivityKind, value: f64, notes: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis().to_string(),
            kind,
            value,
            time: now,
            notes,
            date_str: local_day(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Local, TimeZone, Utc};

    use super::{ActivityKind, ActivityRecord};

    #[test]
    fn test_serialized_field_names() -> Result<()> {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 8, 30, 0).unwrap();
        let record = ActivityRecord::new(ActivityKind::Water, 3., Some("morning".into()), now);

        let value = serde_json::to_value(&record)?;
        let object = value.as_object().unwrap();
        assert!(object.contains_key("id"));
        assert_eq!(object["type"], "water");
        assert_eq!(object["value"], 3.);
        assert!(object.contains_key("time"));
        assert_eq!(object["notes"], "morning");
        assert!(object.contains_key("dateStr"));
        Ok(())
    }

    #[test]
    fn test_missing_notes_deserialize_as_none() -> Result<()> {
        let raw = r#"{
            "id": "1742027400000",
            "type": "sleep",
            "value": 7.5,
            "time": "2025-03-15T08:30:00Z",
            "dateStr": "2025-03-15"
        }"#;
        let record: ActivityRecord = serde_json::from_str(raw)?;
        assert_eq!(record.kind, ActivityKind::Sleep);
        assert_eq!(record.notes, None);
        Ok(())
    }

    #[test]
    fn test_id_derived_from_creation_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 8, 30, 0).unwrap();
        let record = ActivityRecord::new(ActivityKind::Steps, 5000., None, now);
        assert_eq!(record.id, now.timestamp_millis().to_string());
    }

    #[test]
    fn test_day_bucket_follows_local_day_across_midnight() {
        // Construct the instants from local wall-clock times so the assertion
        // holds in any zone the test happens to run in.
        let before = Local.with_ymd_and_hms(2025, 3, 15, 23, 59, 59).unwrap();
        let after = Local.with_ymd_and_hms(2025, 3, 16, 0, 0, 1).unwrap();

        let first = ActivityRecord::new(ActivityKind::Water, 1., None, before.to_utc());
        let second = ActivityRecord::new(ActivityKind::Water, 1., None, after.to_utc());

        assert_eq!(first.date_str, before.date_naive());
        assert_eq!(second.date_str, after.date_naive());
        assert_ne!(first.date_str, second.date_str);
    }
}
