//! In-memory collaborator implementations.
//!
//! Client hosts normally bind the ledger to platform storage (browser
//! local storage, a file next to the save directory) and the recorder to
//! the backend API. These adapters back the headless tester and the test
//! suites, and double as single-process stand-ins for demos.
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use crate::config::RewardConfig;
use crate::ledger::LedgerState;
use crate::{ConfigProvider, LedgerStorage, SessionRecorder};

/// Ledger storage holding the serialized state in memory. Clones share the
/// same slot, mirroring one device-local storage key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl LedgerStorage for MemoryStore {
    type Error = serde_json::Error;

    fn load(&self) -> Result<Option<LedgerState>, Self::Error> {
        self.slot
            .borrow()
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
    }

    fn save(&self, state: &LedgerState) -> Result<(), Self::Error> {
        let blob = serde_json::to_string(state)?;
        *self.slot.borrow_mut() = Some(blob);
        Ok(())
    }
}

impl MemoryStore {
    /// Overwrite the raw stored blob, valid JSON or not. Lets tests model
    /// corrupted device storage.
    pub fn set_raw(&self, blob: impl Into<String>) {
        *self.slot.borrow_mut() = Some(blob.into());
    }
}

/// One recorded game-over outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub team_id: String,
    pub final_score: u32,
}

/// Recorder that appends every session outcome to a shared log.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    records: Rc<RefCell<Vec<SessionRecord>>>,
}

impl MemoryRecorder {
    #[must_use]
    pub fn records(&self) -> Vec<SessionRecord> {
        self.records.borrow().clone()
    }
}

impl SessionRecorder for MemoryRecorder {
    type Error = Infallible;

    fn record_session(&self, team_id: &str, final_score: u32) -> Result<(), Self::Error> {
        self.records.borrow_mut().push(SessionRecord {
            team_id: team_id.to_string(),
            final_score,
        });
        Ok(())
    }
}

/// Configuration provider serving a fixed snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticConfig(pub RewardConfig);

impl ConfigProvider for StaticConfig {
    type Error = Infallible;

    fn reward_config(&self) -> Result<RewardConfig, Self::Error> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DayKey;

    #[test]
    fn store_round_trips_state() {
        let store = MemoryStore::default();
        assert!(store.load().expect("empty load").is_none());
        let state = LedgerState {
            attempts_remaining: 1,
            ad_views_used: 2,
            share_rewards_used: 3,
            last_reset_day: DayKey::new("2026-08-30"),
        };
        store.save(&state).expect("save");
        assert_eq!(store.load().expect("load"), Some(state));
    }

    #[test]
    fn corrupted_blob_surfaces_as_error() {
        let store = MemoryStore::default();
        store.set_raw("{not json");
        assert!(store.load().is_err());
    }

    #[test]
    fn recorder_log_is_shared_across_clones() {
        let recorder = MemoryRecorder::default();
        let clone = recorder.clone();
        clone.record_session("team-7", 4).expect("record");
        assert_eq!(
            recorder.records(),
            vec![SessionRecord {
                team_id: "team-7".to_string(),
                final_score: 4,
            }]
        );
    }
}
