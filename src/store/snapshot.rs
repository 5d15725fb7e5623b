use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{entities::ActivityRecord, kv::KeyValueStore};

/// Fixed key under which the whole activity collection is persisted.
pub const ACTIVITIES_KEY: &str = "activities_v1";

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    records: &'a [ActivityRecord],
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    records: Vec<ActivityRecord>,
}

/// Result of reading the persisted snapshot. An absent key and an unreadable
/// snapshot are kept apart so that callers can decide between surfacing the
/// problem and degrading to an empty collection.
#[derive(Debug)]
pub enum LoadOutcome {
    Records(Vec<ActivityRecord>),
    Empty,
    Unreadable(anyhow::Error),
}

impl LoadOutcome {
    /// The degradation policy of the ui: a storage problem is logged and the
    /// collection is treated as empty.
    pub fn into_records(self) -> Vec<ActivityRecord> {
        match self {
            LoadOutcome::Records(v) => v,
            LoadOutcome::Empty => vec![],
            LoadOutcome::Unreadable(e) => {
                warn!("Failed to load activities, continuing with an empty collection: {e:?}");
                vec![]
            }
        }
    }
}

/// Owns the single persisted collection of [ActivityRecord].
///
/// The snapshot is read and written wholesale. [ActivityStore::save] is
/// always given the complete desired collection, never a delta, and the last
/// save wins.
pub struct ActivityStore<S> {
    kv: S,
}

impl<S: KeyValueStore> ActivityStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Reads the whole persisted collection. Never fails the caller; io
    /// problems and malformed json are both reported as
    /// [LoadOutcome::Unreadable].
    pub async fn load(&self) -> LoadOutcome {
        let raw = match self.kv.get(ACTIVITIES_KEY).await {
            Ok(Some(v)) => v,
            Ok(None) => return LoadOutcome::Empty,
            Err(e) => return LoadOutcome::Unreadable(e),
        };

        match parse_snapshot(&raw) {
            Ok(records) => LoadOutcome::Records(records),
            Err(e) => LoadOutcome::Unreadable(e),
        }
    }

    /// Serializes the full collection and overwrites the persisted snapshot.
    pub async fn save(&self, records: &[ActivityRecord]) -> Result<()> {
        let raw = serde_json::to_string(&SnapshotRef {
            version: SNAPSHOT_VERSION,
            records,
        })?;
        self.kv.set(ACTIVITIES_KEY, raw).await
    }
}

fn parse_snapshot(raw: &str) -> Result<Vec<ActivityRecord>> {
    match serde_json::from_str::<Snapshot>(raw) {
        Ok(snapshot) => {
            if snapshot.version > SNAPSHOT_VERSION {
                // Still usable as long as the record shape matches.
                warn!(
                    "Snapshot version {} is newer than the supported {SNAPSHOT_VERSION}",
                    snapshot.version
                );
            }
            Ok(snapshot.records)
        }
        // Snapshots written before the envelope was introduced are a bare
        // array of records.
        Err(envelope_error) => serde_json::from_str::<Vec<ActivityRecord>>(raw).map_err(|_| {
            anyhow::Error::from(envelope_error).context("Stored snapshot is not a valid snapshot")
        }),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        store::{
            entities::{ActivityKind, ActivityRecord},
            kv::{FileKvStore, KeyValueStore, MemoryKvStore},
            snapshot::{ActivityStore, LoadOutcome, ACTIVITIES_KEY},
        },
        utils::logging::TEST_LOGGING,
    };

    fn sample_records() -> Vec<ActivityRecord> {
        let morning = Utc.with_ymd_and_hms(2025, 3, 15, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2025, 3, 15, 21, 30, 0).unwrap();
        vec![
            ActivityRecord::new(ActivityKind::Sleep, 7.5, None, evening),
            ActivityRecord::new(ActivityKind::Water, 3., Some("with breakfast".into()), morning),
        ]
    }

    #[tokio::test]
    async fn test_load_of_absent_key_is_empty() {
        let store = ActivityStore::new(MemoryKvStore::default());

        assert!(matches!(store.load().await, LoadOutcome::Empty));
        assert_eq!(store.load().await.into_records(), vec![]);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() -> Result<()> {
        let store = ActivityStore::new(MemoryKvStore::default());
        let records = sample_records();

        store.save(&records).await?;

        assert_eq!(store.load().await.into_records(), records);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip_on_disk() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = ActivityStore::new(FileKvStore::new(dir.path().to_owned())?);
        let records = sample_records();

        store.save(&records).await?;

        assert_eq!(store.load().await.into_records(), records);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() -> Result<()> {
        let store = ActivityStore::new(MemoryKvStore::default());
        let records = sample_records();

        store.save(&records).await?;
        store.save(&records[..1]).await?;

        assert_eq!(store.load().await.into_records(), records[..1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_snapshot_degrades_to_empty() -> Result<()> {
        *TEST_LOGGING;
        let kv = MemoryKvStore::default();
        kv.set(ACTIVITIES_KEY, "{not json".into()).await?;

        let store = ActivityStore::new(kv);
        assert!(matches!(store.load().await, LoadOutcome::Unreadable(_)));
        assert_eq!(store.load().await.into_records(), vec![]);
        Ok(())
    }

    #[tokio::test]
    async fn test_unversioned_snapshot_still_loads() -> Result<()> {
        let records = sample_records();
        let kv = MemoryKvStore::default();
        kv.set(ACTIVITIES_KEY, serde_json::to_string(&records)?)
            .await?;

        let store = ActivityStore::new(kv);
        assert_eq!(store.load().await.into_records(), records);
        Ok(())
    }
}
