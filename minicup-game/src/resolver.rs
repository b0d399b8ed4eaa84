//! Shot resolution strategies.
//!
//! Two mechanics exist in the product and are kept as separate strategies
//! behind one trait; a deployment selects one at composition time. The
//! directional mechanic is a discrete zone-guessing duel, the continuous
//! mechanic aims at a coordinate against a wandering keeper.
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::constants::{GOAL_POST_SPAN, SAVE_RADIUS_BASE, SAVE_RADIUS_DECAY, SAVE_RADIUS_MIN};
use crate::keeper::{KeeperConfig, KeeperState};

/// Five aimable zones of the goal mouth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetZone {
    LowerLeft,
    UpperLeft,
    UpperCenter,
    UpperRight,
    LowerRight,
}

impl TargetZone {
    pub const ALL: [Self; 5] = [
        Self::LowerLeft,
        Self::UpperLeft,
        Self::UpperCenter,
        Self::UpperRight,
        Self::LowerRight,
    ];

    /// Uniform random zone, used for the keeper's dive.
    pub fn pick(rng: &mut dyn RngCore) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Did the kick beat the keeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotResult {
    Goal,
    Saved,
}

/// Where the keeper committed at the moment of resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeeperCommit {
    Zone(TargetZone),
    Coordinate(f32),
}

/// Result of resolving one kick, before session bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickResolution {
    pub result: ShotResult,
    pub keeper_final: KeeperCommit,
}

/// A shot-resolution mechanic.
///
/// `resolve` performs the mechanic's decision rule; all random draws go
/// through the supplied stream so tests can script exact outcomes.
pub trait ShotResolver {
    /// Player input type for this mechanic.
    type Aim;

    /// Advance keeper motion. No-op for mechanics without a moving keeper.
    fn tick(&mut self, elapsed_secs: f32, difficulty: f32, rng: &mut dyn RngCore);

    /// Decide the outcome of one kick. Implicitly freezes keeper motion
    /// until `rearm` is called.
    fn resolve(&mut self, aim: &Self::Aim, difficulty: f32, rng: &mut dyn RngCore)
    -> KickResolution;

    /// Reset transient state for the next kick of the rally.
    fn rearm(&mut self);
}

/// Directional-choice mechanic: the player picks one of five zones and the
/// keeper independently does the same. A save requires an exact match, so
/// the nominal goal probability is 4/5 per kick regardless of difficulty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalResolver;

impl ShotResolver for DirectionalResolver {
    type Aim = TargetZone;

    fn tick(&mut self, _elapsed_secs: f32, _difficulty: f32, _rng: &mut dyn RngCore) {}

    fn resolve(
        &mut self,
        aim: &TargetZone,
        _difficulty: f32,
        rng: &mut dyn RngCore,
    ) -> KickResolution {
        let dive = TargetZone::pick(rng);
        let result = if dive == *aim {
            ShotResult::Saved
        } else {
            ShotResult::Goal
        };
        KickResolution {
            result,
            keeper_final: KeeperCommit::Zone(dive),
        }
    }

    fn rearm(&mut self) {}
}

/// Tuning for the continuous-aim mechanic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousConfig {
    #[serde(default)]
    pub keeper: KeeperConfig,
    /// Posts sit at `+/- post_span`; aims at or beyond them always miss.
    #[serde(default = "ContinuousConfig::default_post_span")]
    pub post_span: f32,
    #[serde(default = "ContinuousConfig::default_save_radius_base")]
    pub save_radius_base: f32,
    /// Radius shrink per difficulty point.
    #[serde(default = "ContinuousConfig::default_save_radius_decay")]
    pub save_radius_decay: f32,
    #[serde(default = "ContinuousConfig::default_save_radius_min")]
    pub save_radius_min: f32,
}

impl Default for ContinuousConfig {
    fn default() -> Self {
        Self {
            keeper: KeeperConfig::default(),
            post_span: Self::default_post_span(),
            save_radius_base: Self::default_save_radius_base(),
            save_radius_decay: Self::default_save_radius_decay(),
            save_radius_min: Self::default_save_radius_min(),
        }
    }
}

impl ContinuousConfig {
    #[must_use]
    pub const fn default_post_span() -> f32 {
        GOAL_POST_SPAN
    }

    #[must_use]
    pub const fn default_save_radius_base() -> f32 {
        SAVE_RADIUS_BASE
    }

    #[must_use]
    pub const fn default_save_radius_decay() -> f32 {
        SAVE_RADIUS_DECAY
    }

    #[must_use]
    pub const fn default_save_radius_min() -> f32 {
        SAVE_RADIUS_MIN
    }

    /// Effective save radius at a given difficulty. The radius shrinks as
    /// difficulty rises while keeper motion speeds up: pressure increases
    /// but the hit tolerance widens.
    #[must_use]
    pub fn save_radius(&self, difficulty: f32) -> f32 {
        (self.save_radius_base - difficulty.max(0.0) * self.save_radius_decay)
            .max(self.save_radius_min)
    }
}

/// Continuous-aim mechanic: the keeper wanders along the goal line and the
/// player aims at a horizontal coordinate.
#[derive(Debug, Clone)]
pub struct ContinuousResolver {
    cfg: ContinuousConfig,
    keeper: KeeperState,
}

impl Default for ContinuousResolver {
    fn default() -> Self {
        Self::new(ContinuousConfig::default())
    }
}

impl ContinuousResolver {
    #[must_use]
    pub const fn new(cfg: ContinuousConfig) -> Self {
        Self {
            cfg,
            keeper: KeeperState::centered(),
        }
    }

    #[must_use]
    pub const fn keeper(&self) -> &KeeperState {
        &self.keeper
    }

    #[cfg(test)]
    pub(crate) const fn keeper_mut(&mut self) -> &mut KeeperState {
        &mut self.keeper
    }
}

impl ShotResolver for ContinuousResolver {
    type Aim = f32;

    fn tick(&mut self, elapsed_secs: f32, difficulty: f32, rng: &mut dyn RngCore) {
        self.keeper.tick(&self.cfg.keeper, elapsed_secs, difficulty, rng);
    }

    fn resolve(&mut self, aim: &f32, difficulty: f32, _rng: &mut dyn RngCore) -> KickResolution {
        // Keeper freezes for the resolution window; rearm resumes it.
        self.keeper.suspend();
        let keeper_at = self.keeper.position;

        // At or outside a post is an unconditional miss, wherever the
        // keeper stands.
        let wide = !aim.is_finite() || aim.abs() >= self.cfg.post_span;
        let result = if wide {
            ShotResult::Saved
        } else {
            let distance = (aim - keeper_at).abs();
            if distance > self.cfg.save_radius(difficulty) {
                ShotResult::Goal
            } else {
                ShotResult::Saved
            }
        };
        KickResolution {
            result,
            keeper_final: KeeperCommit::Coordinate(keeper_at),
        }
    }

    fn rearm(&mut self) {
        self.keeper.resume();
    }
}
