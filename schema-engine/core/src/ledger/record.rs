use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::checksum::MANUAL_CHECKSUM;

/// One row of the `_prisma_migrations` table (spec §3.4).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MigrationRecord {
    pub id: Uuid,
    pub checksum: String,
    pub migration_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub rolled_back_at: Option<DateTime<Utc>>,
    pub logs: Option<String>,
    pub applied_steps_count: i32,
}

impl MigrationRecord {
    pub fn new(migration_name: impl Into<String>, checksum: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        MigrationRecord {
            id: Uuid::new_v4(),
            checksum: checksum.into(),
            migration_name: migration_name.into(),
            started_at,
            finished_at: None,
            rolled_back_at: None,
            logs: None,
            applied_steps_count: 0,
        }
    }

    /// A row created by `mark applied`: a manual checksum placeholder and
    /// an already-finished state (spec §4.3, "Mark applied").
    pub fn marked_applied(migration_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        MigrationRecord {
            id: Uuid::new_v4(),
            checksum: MANUAL_CHECKSUM.to_owned(),
            migration_name: migration_name.into(),
            started_at: now,
            finished_at: Some(now),
            rolled_back_at: None,
            logs: None,
            applied_steps_count: 0,
        }
    }

    /// A row created by `mark rolled back`: `rolled_back_at` is set,
    /// `finished_at` stays null (spec §4.3, "Mark rolled back").
    pub fn marked_rolled_back(migration_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        MigrationRecord {
            id: Uuid::new_v4(),
            checksum: MANUAL_CHECKSUM.to_owned(),
            migration_name: migration_name.into(),
            started_at: now,
            finished_at: None,
            rolled_back_at: Some(now),
            logs: None,
            applied_steps_count: 0,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.finished_at.is_some()
    }

    /// A row counts as modified when its stored checksum neither matches
    /// the recomputed one nor is the manual placeholder (spec §4.3, "List
    /// modified").
    pub fn is_modified(&self, recomputed_checksum: &str) -> bool {
        self.checksum != recomputed_checksum && self.checksum != MANUAL_CHECKSUM
    }
}
