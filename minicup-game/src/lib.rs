//! MiniCup Game Engine
//!
//! Platform-agnostic core logic for the MiniCup penalty-kick mini-game.
//! This crate provides the daily play-limit ledger, the shot-resolution
//! strategies, and the session orchestrator without UI or platform-specific
//! dependencies. Hosts supply storage, configuration, and recording
//! backends through the traits defined here.

pub mod clock;
pub mod config;
pub mod constants;
pub mod keeper;
pub mod ledger;
pub mod memory;
pub mod resolver;
pub mod rng;
pub mod session;

// Re-export commonly used types
pub use clock::{Clock, DayKey, ManualClock, SystemClock};
pub use config::{RewardConfig, RewardConfigError};
pub use keeper::{KeeperConfig, KeeperState};
pub use ledger::{LedgerState, PlayLimitLedger, RewardPath};
pub use memory::{MemoryRecorder, MemoryStore, SessionRecord, StaticConfig};
pub use resolver::{
    ContinuousConfig, ContinuousResolver, DirectionalResolver, KeeperCommit, KickResolution,
    ShotResolver, ShotResult, TargetZone,
};
pub use rng::{CountingRng, RngBundle};
pub use session::{GameSession, MatchPhase, MatchState, ShotOutcome, StartOutcome};

use std::rc::Rc;

/// Trait for fetching the operator-tuned reward configuration.
/// Platform-specific implementations should provide this.
pub trait ConfigProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the current reward configuration snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be fetched or parsed.
    fn reward_config(&self) -> Result<RewardConfig, Self::Error>;
}

/// Trait for abstracting device-local ledger persistence.
/// Platform-specific implementations should provide this.
pub trait LedgerStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the persisted ledger state, `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if stored data exists but cannot be decoded.
    fn load(&self) -> Result<Option<ledger::LedgerState>, Self::Error>;

    /// Persist the full ledger state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    fn save(&self, state: &ledger::LedgerState) -> Result<(), Self::Error>;
}

/// Trait for reporting finished sessions to the leaderboard backend.
/// Calls are best-effort; the session logs and swallows failures.
pub trait SessionRecorder {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Record one game-over outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the outcome cannot be delivered.
    fn record_session(&self, team_id: &str, final_score: u32) -> Result<(), Self::Error>;
}

/// Composition root wiring configuration and recording backends to
/// sessions.
pub struct GameEngine<P, T>
where
    P: ConfigProvider,
    T: SessionRecorder,
{
    provider: P,
    recorder: T,
}

impl<P, T> GameEngine<P, T>
where
    P: ConfigProvider,
    T: SessionRecorder + Clone,
{
    /// Create a new engine with the provided configuration source and
    /// session recorder.
    pub const fn new(provider: P, recorder: T) -> Self {
        Self { provider, recorder }
    }

    /// Read the reward configuration, falling back to the built-in
    /// defaults when the provider is unreachable.
    pub fn load_reward_config(&self) -> RewardConfig {
        match self.provider.reward_config() {
            Ok(cfg) => cfg.sanitized(),
            Err(err) => {
                log::warn!("reward config unavailable, using defaults: {err}");
                RewardConfig::default()
            }
        }
    }

    /// Start a session for one team against the chosen resolver strategy.
    /// The configuration is snapshotted here and stays immutable for the
    /// session's lifetime.
    pub fn create_session<R, S, C>(
        &self,
        team_id: impl Into<String>,
        resolver: R,
        storage: S,
        clock: C,
        seed: u64,
    ) -> GameSession<R, S, C, T>
    where
        R: ShotResolver,
        S: LedgerStorage,
        C: Clock,
    {
        let cfg = self.load_reward_config();
        let ledger = PlayLimitLedger::initialize(cfg, storage, clock);
        GameSession::new(
            team_id,
            ledger,
            resolver,
            self.recorder.clone(),
            Rc::new(RngBundle::from_user_seed(seed)),
        )
    }
}
