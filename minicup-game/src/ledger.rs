//! Daily play-limit ledger and reward economy.
//!
//! Single source of truth for "may the player take another shot right now,
//! and if not, how can they unlock more". Per day the ledger walks
//! FRESH -> EXHAUSTED -> REPLENISHED (per reward grant) -> LOCKED once all
//! counters are maxed; the transition back to FRESH is checked lazily on
//! every read by comparing day-keys, never by a scheduled timer.
use serde::{Deserialize, Serialize};

use crate::LedgerStorage;
use crate::clock::{Clock, DayKey};
use crate::config::RewardConfig;

/// Persisted per-device play allowance for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub attempts_remaining: u32,
    pub ad_views_used: u32,
    pub share_rewards_used: u32,
    pub last_reset_day: DayKey,
}

impl LedgerState {
    /// Fresh allotment for a new day.
    #[must_use]
    pub fn fresh(cfg: &RewardConfig, today: DayKey) -> Self {
        Self {
            attempts_remaining: cfg.free_plays,
            ad_views_used: 0,
            share_rewards_used: 0,
            last_reset_day: today,
        }
    }

    /// Clamp counters against the active configuration. A cap lowered by
    /// the operator since the state was written must not unlock further
    /// grants, and loaded data is never trusted beyond the caps.
    fn clamped(mut self, cfg: &RewardConfig) -> Self {
        self.ad_views_used = self.ad_views_used.min(cfg.max_ad_views);
        self.share_rewards_used = self.share_rewards_used.min(cfg.max_share_rewards);
        self
    }
}

/// Reward path the UI should surface next. Ad strictly precedes share:
/// share is only offered once the ad cap is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardPath {
    Ad,
    Share,
}

/// Daily play-limit ledger bound to a storage backend and a clock.
///
/// Every mutator persists the full state so a reload mid-session resumes
/// correctly. Persistence is best-effort: a failing save is logged and
/// never blocks gameplay, and malformed or missing persisted data fails
/// open to a fresh day.
#[derive(Debug, Clone)]
pub struct PlayLimitLedger<S, C> {
    cfg: RewardConfig,
    state: LedgerState,
    storage: S,
    clock: C,
}

impl<S: LedgerStorage, C: Clock> PlayLimitLedger<S, C> {
    /// Load persisted state or start a fresh day.
    pub fn initialize(cfg: RewardConfig, storage: S, clock: C) -> Self {
        let cfg = cfg.sanitized();
        let today = clock.today();
        let loaded = match storage.load() {
            Ok(state) => state,
            Err(err) => {
                log::warn!("ledger load failed, starting fresh: {err}");
                None
            }
        };

        let mut ledger = Self {
            cfg,
            state: LedgerState::fresh(&cfg, today.clone()),
            storage,
            clock,
        };
        match loaded {
            Some(state) if state.last_reset_day == today => {
                ledger.state = state.clamped(&cfg);
            }
            _ => ledger.persist(),
        }
        ledger
    }

    /// Roll to a fresh day if the calendar moved since the last reset.
    fn roll_day(&mut self) {
        let today = self.clock.today();
        if self.state.last_reset_day != today {
            self.state = LedgerState::fresh(&self.cfg, today);
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save(&self.state) {
            log::warn!("ledger save failed: {err}");
        }
    }

    /// May the player take a shot right now.
    pub fn can_attempt_shot(&mut self) -> bool {
        self.roll_day();
        self.state.attempts_remaining > 0
    }

    /// Authoritative "is the player completely done for today" check.
    pub fn can_play_more(&mut self) -> bool {
        self.roll_day();
        self.state.attempts_remaining > 0
            || self.state.ad_views_used < self.cfg.max_ad_views
            || self.state.share_rewards_used < self.cfg.max_share_rewards
    }

    /// Attempts are exhausted and an ad reward is still available.
    pub fn needs_ad_to_continue(&mut self) -> bool {
        self.roll_day();
        self.state.attempts_remaining == 0 && self.state.ad_views_used < self.cfg.max_ad_views
    }

    /// Attempts are exhausted and a share reward is still available. The
    /// share path only opens once the ad cap is spent; while an ad can
    /// still be offered, this stays false.
    pub fn can_share_to_continue(&mut self) -> bool {
        self.roll_day();
        self.state.attempts_remaining == 0
            && self.state.ad_views_used >= self.cfg.max_ad_views
            && self.state.share_rewards_used < self.cfg.max_share_rewards
    }

    /// The reward prompt to surface when attempts are exhausted, ad first.
    pub fn next_reward_path(&mut self) -> Option<RewardPath> {
        if self.needs_ad_to_continue() {
            Some(RewardPath::Ad)
        } else if self.can_share_to_continue() {
            Some(RewardPath::Share)
        } else {
            None
        }
    }

    /// Spend one attempt. The only mutator invoked at shot time.
    pub fn consume_attempt(&mut self) -> bool {
        self.roll_day();
        if self.state.attempts_remaining == 0 {
            return false;
        }
        self.state.attempts_remaining -= 1;
        self.persist();
        true
    }

    /// Apply a completed ad watch. The reward batch replaces any leftover
    /// attempts, it never stacks.
    pub fn grant_ad_reward(&mut self) -> bool {
        self.roll_day();
        if self.state.ad_views_used >= self.cfg.max_ad_views {
            return false;
        }
        self.state.ad_views_used += 1;
        self.state.attempts_remaining = self.cfg.plays_per_ad;
        self.persist();
        true
    }

    /// Apply a completed share, symmetric to `grant_ad_reward`.
    pub fn grant_share_reward(&mut self) -> bool {
        self.roll_day();
        if self.state.share_rewards_used >= self.cfg.max_share_rewards {
            return false;
        }
        self.state.share_rewards_used += 1;
        self.state.attempts_remaining = self.cfg.plays_per_share;
        self.persist();
        true
    }

    /// Attempts still available before the next reward prompt.
    pub fn attempts_remaining(&mut self) -> u32 {
        self.roll_day();
        self.state.attempts_remaining
    }

    /// Attempts spent so far today, derived for UI progress display.
    pub fn total_attempts_used_today(&mut self) -> u32 {
        self.roll_day();
        let granted = self.cfg.free_plays
            + self.state.ad_views_used * self.cfg.plays_per_ad
            + self.state.share_rewards_used * self.cfg.plays_per_share;
        granted.saturating_sub(self.state.attempts_remaining)
    }

    /// Total attempts the player can possibly earn today.
    #[must_use]
    pub const fn total_attempts_available_today(&self) -> u32 {
        self.cfg.total_attempts_available()
    }

    #[must_use]
    pub const fn config(&self) -> &RewardConfig {
        &self.cfg
    }

    /// Current state snapshot; callers needing rollover semantics should
    /// use the query methods instead.
    #[must_use]
    pub const fn state(&self) -> &LedgerState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::memory::MemoryStore;

    fn day(key: &str) -> DayKey {
        DayKey::new(key)
    }

    fn ledger_with(
        cfg: RewardConfig,
    ) -> (PlayLimitLedger<MemoryStore, ManualClock>, MemoryStore, ManualClock) {
        let store = MemoryStore::default();
        let clock = ManualClock::starting_at(day("2026-08-30"));
        let ledger = PlayLimitLedger::initialize(cfg, store.clone(), clock.clone());
        (ledger, store, clock)
    }

    #[test]
    fn fresh_day_grants_free_plays() {
        let (mut ledger, store, _) = ledger_with(RewardConfig::default());
        assert_eq!(ledger.attempts_remaining(), 2);
        assert!(ledger.can_attempt_shot());
        // initialize persists the fresh state
        let saved = store.load().expect("load").expect("state present");
        assert_eq!(saved.attempts_remaining, 2);
        assert_eq!(saved.last_reset_day, day("2026-08-30"));
    }

    #[test]
    fn stale_persisted_state_rolls_over() {
        let store = MemoryStore::default();
        store
            .save(&LedgerState {
                attempts_remaining: 0,
                ad_views_used: 5,
                share_rewards_used: 3,
                last_reset_day: day("2026-08-29"),
            })
            .expect("seed save");
        let clock = ManualClock::starting_at(day("2026-08-30"));
        let mut ledger = PlayLimitLedger::initialize(RewardConfig::default(), store, clock);
        assert_eq!(ledger.attempts_remaining(), 2);
        assert_eq!(ledger.state().ad_views_used, 0);
        assert_eq!(ledger.state().share_rewards_used, 0);
    }

    #[test]
    fn same_day_state_is_resumed() {
        let store = MemoryStore::default();
        store
            .save(&LedgerState {
                attempts_remaining: 1,
                ad_views_used: 2,
                share_rewards_used: 0,
                last_reset_day: day("2026-08-30"),
            })
            .expect("seed save");
        let clock = ManualClock::starting_at(day("2026-08-30"));
        let mut ledger = PlayLimitLedger::initialize(RewardConfig::default(), store, clock);
        assert_eq!(ledger.attempts_remaining(), 1);
        assert_eq!(ledger.state().ad_views_used, 2);
    }

    #[test]
    fn midnight_rollover_is_lazy() {
        let (mut ledger, _, clock) = ledger_with(RewardConfig::default());
        while ledger.consume_attempt() {}
        assert!(!ledger.can_attempt_shot());

        clock.set_today(day("2026-08-31"));
        // next read observes the fresh allotment without any explicit reset
        assert!(ledger.can_attempt_shot());
        assert_eq!(ledger.attempts_remaining(), 2);
    }

    #[test]
    fn reward_replaces_leftover_instead_of_stacking() {
        let cfg = RewardConfig {
            free_plays: 3,
            plays_per_ad: 2,
            ..RewardConfig::default()
        };
        let (mut ledger, _, _) = ledger_with(cfg);
        assert!(ledger.consume_attempt());
        assert_eq!(ledger.attempts_remaining(), 2);
        assert!(ledger.grant_ad_reward());
        // 2 leftover were replaced by the batch of 2, not added to it
        assert_eq!(ledger.attempts_remaining(), 2);
    }

    #[test]
    fn grants_beyond_cap_are_rejected() {
        let cfg = RewardConfig {
            max_ad_views: 1,
            max_share_rewards: 0,
            ..RewardConfig::default()
        };
        let (mut ledger, _, _) = ledger_with(cfg);
        while ledger.consume_attempt() {}
        assert!(ledger.grant_ad_reward());
        while ledger.consume_attempt() {}
        let before = ledger.state().clone();
        assert!(!ledger.grant_ad_reward());
        assert!(!ledger.grant_share_reward());
        assert_eq!(ledger.state(), &before);
        assert!(!ledger.can_play_more());
    }

    #[test]
    fn ad_path_precedes_share_path() {
        let (mut ledger, _, _) = ledger_with(RewardConfig::default());
        while ledger.consume_attempt() {}
        assert_eq!(ledger.next_reward_path(), Some(RewardPath::Ad));
        assert!(!ledger.can_share_to_continue());

        for _ in 0..5 {
            assert!(ledger.grant_ad_reward());
            while ledger.consume_attempt() {}
        }
        assert_eq!(ledger.next_reward_path(), Some(RewardPath::Share));
        assert!(ledger.can_share_to_continue());
    }

    #[test]
    fn loaded_counters_are_clamped_to_caps() {
        let store = MemoryStore::default();
        store
            .save(&LedgerState {
                attempts_remaining: 0,
                ad_views_used: 9,
                share_rewards_used: 9,
                last_reset_day: day("2026-08-30"),
            })
            .expect("seed save");
        let clock = ManualClock::starting_at(day("2026-08-30"));
        let mut ledger = PlayLimitLedger::initialize(RewardConfig::default(), store, clock);
        assert_eq!(ledger.state().ad_views_used, 5);
        assert_eq!(ledger.state().share_rewards_used, 3);
        assert!(!ledger.grant_ad_reward());
        assert!(!ledger.can_play_more());
    }

    #[test]
    fn usage_accounting_tracks_grants() {
        let (mut ledger, _, _) = ledger_with(RewardConfig::default());
        assert_eq!(ledger.total_attempts_available_today(), 18);
        assert_eq!(ledger.total_attempts_used_today(), 0);

        assert!(ledger.consume_attempt());
        assert_eq!(ledger.total_attempts_used_today(), 1);

        while ledger.consume_attempt() {}
        assert!(ledger.grant_ad_reward());
        // 2 free used, one batch of 2 granted and untouched
        assert_eq!(ledger.total_attempts_used_today(), 2);
        assert!(ledger.consume_attempt());
        assert_eq!(ledger.total_attempts_used_today(), 3);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let (mut ledger, store, _) = ledger_with(RewardConfig::default());
        ledger.consume_attempt();
        assert_eq!(
            store.load().expect("load").expect("state").attempts_remaining,
            1
        );
        while ledger.consume_attempt() {}
        ledger.grant_ad_reward();
        let saved = store.load().expect("load").expect("state");
        assert_eq!(saved.ad_views_used, 1);
        assert_eq!(saved.attempts_remaining, 2);
    }
}
