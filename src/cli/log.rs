use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser};
use tracing::warn;

use crate::{
    store::{
        entities::{ActivityKind, ActivityRecord},
        kv::KeyValueStore,
        snapshot::ActivityStore,
    },
    utils::clock::{Clock, DefaultClock},
};

use super::{format_value, Args};

#[derive(Debug, Parser)]
pub struct LogCommand {
    #[arg(
        short,
        long,
        help = "Activity to log: water (glasses), steps or sleep (hours)"
    )]
    kind: Option<ActivityKind>,
    #[arg(short, long, help = "Amount for the activity. Examples are 8, 5000, 7.5")]
    value: String,
    #[arg(short, long, help = "Optional note attached to the entry")]
    notes: Option<String>,
}

/// Command to process `log` command. Validates the submission, constructs a
/// record and persists the collection with the new entry prepended.
pub async fn process_log_command(
    store: &ActivityStore<impl KeyValueStore>,
    command: LogCommand,
) -> Result<()> {
    let (kind, value) = match validate_submission(command.kind, &command.value) {
        Ok(v) => v,
        Err(e) => {
            return Err(Args::command()
                .error(clap::error::ErrorKind::ValueValidation, e)
                .into());
        }
    };

    match submit(store, &DefaultClock, kind, value, command.notes).await {
        Ok(record) => {
            println!(
                "Logged {} {} of {}.",
                format_value(record.value),
                record.kind.unit(),
                record.kind
            );
        }
        Err(e) => {
            // Storage failure is never fatal, the entry is simply lost.
            warn!("Failed to persist the new entry: {e:?}");
            println!("Could not save the entry.");
        }
    }
    Ok(())
}

/// Checks a submission the way the input form did: an activity has to be
/// chosen and the value text has to be a non-negative number.
fn validate_submission(
    kind: Option<ActivityKind>,
    value: &str,
) -> Result<(ActivityKind, f64)> {
    let Some(kind) = kind else {
        return Err(anyhow!("Please choose an activity kind."));
    };
    Ok((kind, parse_value(value)?))
}

fn parse_value(text: &str) -> Result<f64> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|_| anyhow!("Please enter a valid numeric value."))?;
    if !value.is_finite() || value < 0. {
        return Err(anyhow!("Please enter a valid numeric value."));
    }
    Ok(value)
}

/// Prepends a freshly constructed record to the stored collection and saves
/// the full collection back. An unreadable previous snapshot degrades to an
/// empty one instead of blocking the submission.
pub async fn submit(
    store: &ActivityStore<impl KeyValueStore>,
    clock: &impl Clock,
    kind: ActivityKind,
    value: f64,
    notes: Option<String>,
) -> Result<ActivityRecord> {
    let record = ActivityRecord::new(kind, value, notes, clock.now());

    let mut records = store.load().await.into_records();
    records.insert(0, record.clone());
    store.save(&records).await?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::Utc;

    use crate::{
        store::{
            entities::ActivityKind,
            kv::MemoryKvStore,
            snapshot::ActivityStore,
        },
        utils::clock::MockClock,
    };

    use super::{parse_value, submit, validate_submission};

    fn clock_at(timestamp: &str) -> MockClock {
        let time = timestamp.parse::<chrono::DateTime<Utc>>().unwrap();
        let mut clock = MockClock::new();
        clock.expect_now().return_const(time);
        clock
    }

    #[test]
    fn test_parse_value_accepts_non_negative_numbers() -> Result<()> {
        assert_eq!(parse_value("8")?, 8.);
        assert_eq!(parse_value("7.5")?, 7.5);
        assert_eq!(parse_value(" 0 ")?, 0.);
        Ok(())
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert!(parse_value("abc").is_err());
        assert!(parse_value("-1").is_err());
        assert!(parse_value("").is_err());
        assert!(parse_value("NaN").is_err());
    }

    #[test]
    fn test_validation_requires_a_kind() {
        assert!(validate_submission(None, "8").is_err());
        assert!(validate_submission(Some(ActivityKind::Water), "8").is_ok());
    }

    #[tokio::test]
    async fn test_submit_prepends_to_the_collection() -> Result<()> {
        let store = ActivityStore::new(MemoryKvStore::default());

        let first = clock_at("2025-03-15T08:00:00Z");
        submit(&store, &first, ActivityKind::Water, 3., None).await?;

        let second = clock_at("2025-03-15T12:00:00Z");
        submit(&store, &second, ActivityKind::Steps, 5000., Some("walk".into())).await?;

        let records = store.load().await.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, ActivityKind::Steps);
        assert_eq!(records[1].kind, ActivityKind::Water);
        assert_ne!(records[0].id, records[1].id);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_submission_leaves_the_collection_alone() -> Result<()> {
        let store = ActivityStore::new(MemoryKvStore::default());

        let clock = clock_at("2025-03-15T08:00:00Z");
        submit(&store, &clock, ActivityKind::Water, 3., None).await?;
        let before = store.load().await.into_records();

        for text in ["-1", "abc"] {
            assert!(validate_submission(Some(ActivityKind::Water), text).is_err());
        }

        assert_eq!(store.load().await.into_records(), before);
        Ok(())
    }
}
