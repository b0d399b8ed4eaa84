//! Game session orchestration: ledger gating, rally billing, recording.
//!
//! One consumed attempt buys one rally: the player keeps kicking until the
//! first save, however many goals are scored along the way. The session
//! never bypasses the ledger, and records its final score best-effort on
//! game over.
use std::rc::Rc;

use crate::clock::Clock;
use crate::constants::{DIFFICULTY_BASE, DIFFICULTY_STEP_PER_GOAL};
use crate::ledger::{PlayLimitLedger, RewardPath};
use crate::resolver::{KeeperCommit, ShotResolver, ShotResult};
use crate::rng::RngBundle;
use crate::{LedgerStorage, SessionRecorder};

/// Where the active match currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Waiting for the player to aim and confirm a kick.
    Aiming,
    /// A kick was scored; waiting for the rally to rearm.
    Scored,
    /// The keeper saved; the match is over once acknowledged.
    Saved,
}

/// Ephemeral per-rally state owned by the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchState {
    pub score: u32,
    pub difficulty: f32,
    pub phase: MatchPhase,
}

impl MatchState {
    const fn fresh() -> Self {
        Self {
            score: 0,
            difficulty: DIFFICULTY_BASE,
            phase: MatchPhase::Aiming,
        }
    }
}

/// Result of asking the session to start a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// An attempt was consumed and the rally is live.
    Started,
    /// Attempts are exhausted; surface this reward prompt first.
    RewardRequired(RewardPath),
    /// Every path for today is spent; locked until the day-key changes.
    LockedForToday,
}

/// Outcome of one confirmed kick, as reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotOutcome {
    pub result: ShotResult,
    pub score_after: u32,
    pub keeper_final: KeeperCommit,
}

/// Drives one playthrough against a chosen resolver strategy.
pub struct GameSession<R, S, C, T> {
    team_id: String,
    ledger: PlayLimitLedger<S, C>,
    resolver: R,
    recorder: T,
    rng: Rc<RngBundle>,
    current: Option<MatchState>,
}

impl<R, S, C, T> GameSession<R, S, C, T>
where
    R: ShotResolver,
    S: LedgerStorage,
    C: Clock,
    T: SessionRecorder,
{
    #[must_use]
    pub fn new(
        team_id: impl Into<String>,
        ledger: PlayLimitLedger<S, C>,
        resolver: R,
        recorder: T,
        rng: Rc<RngBundle>,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            ledger,
            resolver,
            recorder,
            rng,
            current: None,
        }
    }

    /// Gate a new rally through the ledger. Consumes exactly one attempt
    /// on success; otherwise reports which reward prompt to surface.
    pub fn try_start_match(&mut self) -> StartOutcome {
        if self.current.is_some() {
            // A rally is already live; starting again must not double-bill.
            return StartOutcome::Started;
        }
        if self.ledger.consume_attempt() {
            self.resolver.rearm();
            self.current = Some(MatchState::fresh());
            return StartOutcome::Started;
        }
        match self.ledger.next_reward_path() {
            Some(path) => StartOutcome::RewardRequired(path),
            None => StartOutcome::LockedForToday,
        }
    }

    /// External signal: the presented ad finished playing.
    pub fn ad_watch_completed(&mut self) -> bool {
        self.ledger.grant_ad_reward()
    }

    /// External signal: the share action completed.
    pub fn share_completed(&mut self) -> bool {
        self.ledger.grant_share_reward()
    }

    /// Advance keeper motion while the player is aiming. Frozen during the
    /// resolution window and when no rally is live.
    pub fn tick(&mut self, elapsed_secs: f32) {
        if let Some(state) = self.current
            && state.phase == MatchPhase::Aiming
        {
            self.resolver
                .tick(elapsed_secs, state.difficulty, &mut *self.rng.keeper());
        }
    }

    /// Confirm a kick. Returns `None` when no rally is live or the previous
    /// kick has not been acknowledged yet.
    pub fn take_shot(&mut self, aim: &R::Aim) -> Option<ShotOutcome> {
        let state = self.current.as_mut()?;
        if state.phase != MatchPhase::Aiming {
            return None;
        }

        let kick = self
            .resolver
            .resolve(aim, state.difficulty, &mut *self.rng.resolve());
        match kick.result {
            ShotResult::Goal => {
                state.score += 1;
                state.difficulty += DIFFICULTY_STEP_PER_GOAL;
                state.phase = MatchPhase::Scored;
            }
            ShotResult::Saved => {
                state.phase = MatchPhase::Saved;
                let final_score = state.score;
                // Best-effort: a failing recorder must never block the
                // game-over transition.
                if let Err(err) = self.recorder.record_session(&self.team_id, final_score) {
                    log::warn!("session record failed for {}: {err}", self.team_id);
                }
            }
        }
        Some(ShotOutcome {
            result: kick.result,
            score_after: state.score,
            keeper_final: kick.keeper_final,
        })
    }

    /// Acknowledge a scored kick and rearm for the next one in the rally.
    pub fn next_kick(&mut self) -> bool {
        match self.current.as_mut() {
            Some(state) if state.phase == MatchPhase::Scored => {
                state.phase = MatchPhase::Aiming;
                self.resolver.rearm();
                true
            }
            _ => false,
        }
    }

    /// Acknowledge a save and close the match, returning the final score.
    /// The outcome was already recorded when the save was resolved.
    pub fn finish_match(&mut self) -> Option<u32> {
        match self.current {
            Some(state) if state.phase == MatchPhase::Saved => {
                self.current = None;
                Some(state.score)
            }
            _ => None,
        }
    }

    /// Discard a live rally without refund or record, e.g. when the player
    /// navigates away mid-match.
    pub fn abandon_match(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn match_state(&self) -> Option<&MatchState> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn ledger(&mut self) -> &mut PlayLimitLedger<S, C> {
        &mut self.ledger
    }

    #[must_use]
    pub fn team_id(&self) -> &str {
        &self.team_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{DayKey, ManualClock};
    use crate::config::RewardConfig;
    use crate::memory::{MemoryRecorder, MemoryStore};
    use crate::resolver::DirectionalResolver;

    fn session(
        cfg: RewardConfig,
        seed: u64,
    ) -> (
        GameSession<DirectionalResolver, MemoryStore, ManualClock, MemoryRecorder>,
        MemoryRecorder,
    ) {
        let clock = ManualClock::starting_at(DayKey::new("2026-08-30"));
        let ledger = PlayLimitLedger::initialize(cfg, MemoryStore::default(), clock);
        let recorder = MemoryRecorder::default();
        let game = GameSession::new(
            "team-1",
            ledger,
            DirectionalResolver,
            recorder.clone(),
            Rc::new(RngBundle::from_user_seed(seed)),
        );
        (game, recorder)
    }

    fn play_rally_to_save(
        game: &mut GameSession<DirectionalResolver, MemoryStore, ManualClock, MemoryRecorder>,
    ) -> u32 {
        loop {
            let outcome = game
                .take_shot(&crate::resolver::TargetZone::UpperCenter)
                .expect("rally is live");
            match outcome.result {
                ShotResult::Goal => assert!(game.next_kick()),
                ShotResult::Saved => {
                    return game.finish_match().expect("match finishes after save");
                }
            }
        }
    }

    #[test]
    fn rally_bills_one_attempt_regardless_of_goals() {
        let (mut game, _) = session(RewardConfig::default(), 11);
        assert_eq!(game.try_start_match(), StartOutcome::Started);
        assert_eq!(game.ledger().attempts_remaining(), 1);
        play_rally_to_save(&mut game);
        // However long the rally ran, only the start consumed an attempt.
        assert_eq!(game.ledger().attempts_remaining(), 1);
        assert_eq!(game.ledger().total_attempts_used_today(), 1);
    }

    #[test]
    fn saved_shot_records_final_score_once() {
        let (mut game, recorder) = session(RewardConfig::default(), 3);
        assert_eq!(game.try_start_match(), StartOutcome::Started);
        let score = play_rally_to_save(&mut game);
        let records = recorder.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].team_id, "team-1");
        assert_eq!(records[0].final_score, score);
    }

    #[test]
    fn exhausted_ledger_surfaces_ad_prompt_first() {
        let cfg = RewardConfig {
            free_plays: 1,
            ..RewardConfig::default()
        };
        let (mut game, _) = session(cfg, 7);
        assert_eq!(game.try_start_match(), StartOutcome::Started);
        play_rally_to_save(&mut game);
        assert_eq!(
            game.try_start_match(),
            StartOutcome::RewardRequired(RewardPath::Ad)
        );
        // Dismissing the prompt grants nothing; the gate holds.
        assert_eq!(
            game.try_start_match(),
            StartOutcome::RewardRequired(RewardPath::Ad)
        );
        assert!(game.ad_watch_completed());
        assert_eq!(game.try_start_match(), StartOutcome::Started);
    }

    #[test]
    fn locked_when_every_path_is_spent() {
        let cfg = RewardConfig {
            free_plays: 1,
            plays_per_ad: 1,
            max_ad_views: 1,
            max_share_rewards: 0,
            ..RewardConfig::default()
        };
        let (mut game, _) = session(cfg, 19);
        assert_eq!(game.try_start_match(), StartOutcome::Started);
        play_rally_to_save(&mut game);
        assert!(game.ad_watch_completed());
        assert_eq!(game.try_start_match(), StartOutcome::Started);
        play_rally_to_save(&mut game);
        assert_eq!(game.try_start_match(), StartOutcome::LockedForToday);
    }

    #[test]
    fn shots_are_rejected_outside_a_live_rally() {
        let (mut game, recorder) = session(RewardConfig::default(), 23);
        assert!(game.take_shot(&crate::resolver::TargetZone::LowerLeft).is_none());
        assert_eq!(game.try_start_match(), StartOutcome::Started);
        game.abandon_match();
        assert!(game.take_shot(&crate::resolver::TargetZone::LowerLeft).is_none());
        // Abandoning records nothing and refunds nothing.
        assert!(recorder.records().is_empty());
        assert_eq!(game.ledger().attempts_remaining(), 1);
    }

    #[test]
    fn starting_twice_does_not_double_bill() {
        let (mut game, _) = session(RewardConfig::default(), 29);
        assert_eq!(game.try_start_match(), StartOutcome::Started);
        assert_eq!(game.try_start_match(), StartOutcome::Started);
        assert_eq!(game.ledger().attempts_remaining(), 1);
    }

    #[test]
    fn difficulty_rises_with_each_goal() {
        let (mut game, _) = session(RewardConfig::default(), 31);
        assert_eq!(game.try_start_match(), StartOutcome::Started);
        let mut last_difficulty = game.match_state().expect("live").difficulty;
        loop {
            let outcome = game
                .take_shot(&crate::resolver::TargetZone::LowerRight)
                .expect("live");
            match outcome.result {
                ShotResult::Goal => {
                    let now = game.match_state().expect("live").difficulty;
                    assert!(now > last_difficulty);
                    last_difficulty = now;
                    game.next_kick();
                }
                ShotResult::Saved => break,
            }
        }
    }
}
