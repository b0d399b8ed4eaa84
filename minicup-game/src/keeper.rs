//! Goalkeeper wander model for the continuous-aim mechanic.
//!
//! The keeper drifts laterally along the goal line toward a wander target,
//! reassigned on arrival, on boundary contact, or probabilistically at a
//! rate that rises with difficulty. Motion is advanced by an explicit
//! `tick` stepping function driven by an external scheduler, so it is
//! testable without wall-clock delays.
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::constants::{
    KEEPER_ARRIVAL_EPSILON, KEEPER_BASE_SPEED, KEEPER_RETARGET_BASE_RATE,
    KEEPER_RETARGET_PER_DIFFICULTY, KEEPER_SPEED_PER_DIFFICULTY, KEEPER_WANDER_RANGE,
};

/// Tuning for keeper motion along the goal line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Keeper stays within `[-range, range]`.
    pub range: f32,
    /// Lateral speed at zero difficulty, in goal-mouth units per second.
    pub base_speed: f32,
    /// Additional speed per difficulty point.
    pub speed_per_difficulty: f32,
    /// Expected wander-target reassignments per second at zero difficulty.
    pub retarget_base_rate: f32,
    /// Additional reassignment rate per difficulty point.
    pub retarget_per_difficulty: f32,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            range: KEEPER_WANDER_RANGE,
            base_speed: KEEPER_BASE_SPEED,
            speed_per_difficulty: KEEPER_SPEED_PER_DIFFICULTY,
            retarget_base_rate: KEEPER_RETARGET_BASE_RATE,
            retarget_per_difficulty: KEEPER_RETARGET_PER_DIFFICULTY,
        }
    }
}

/// Keeper position and wander target along the goal line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeeperState {
    pub position: f32,
    pub target: f32,
    suspended: bool,
}

impl Default for KeeperState {
    fn default() -> Self {
        Self::centered()
    }
}

impl KeeperState {
    /// Keeper at rest in the middle of the goal.
    #[must_use]
    pub const fn centered() -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            suspended: false,
        }
    }

    /// Freeze motion while a shot is in its resolution window. Ticks
    /// received while suspended leave the position unchanged.
    pub const fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Resume motion for the next kick.
    pub const fn resume(&mut self) {
        self.suspended = false;
    }

    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Advance keeper motion by `elapsed_secs` and return the new position.
    pub fn tick(
        &mut self,
        cfg: &KeeperConfig,
        elapsed_secs: f32,
        difficulty: f32,
        rng: &mut dyn RngCore,
    ) -> f32 {
        if self.suspended || !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return self.position;
        }

        let speed = cfg.base_speed + difficulty.max(0.0) * cfg.speed_per_difficulty;
        let step = speed * elapsed_secs;
        let delta = self.target - self.position;
        if delta.abs() <= step {
            self.position = self.target;
        } else {
            self.position += step * delta.signum();
        }
        self.position = self.position.clamp(-cfg.range, cfg.range);

        let arrived = (self.target - self.position).abs() <= KEEPER_ARRIVAL_EPSILON;
        let at_boundary = self.position.abs() >= cfg.range - KEEPER_ARRIVAL_EPSILON;
        if arrived || at_boundary || self.roll_retarget(cfg, elapsed_secs, difficulty, rng) {
            self.retarget(cfg, rng);
        }
        self.position
    }

    fn roll_retarget(
        &self,
        cfg: &KeeperConfig,
        elapsed_secs: f32,
        difficulty: f32,
        rng: &mut dyn RngCore,
    ) -> bool {
        let rate = cfg.retarget_base_rate + difficulty.max(0.0) * cfg.retarget_per_difficulty;
        // Per-tick probability approximating a Poisson rate; capped so a
        // long elapsed interval cannot force certain reassignment.
        let p = f64::from((rate * elapsed_secs).clamp(0.0, 0.5));
        rng.gen_bool(p)
    }

    fn retarget(&mut self, cfg: &KeeperConfig, rng: &mut dyn RngCore) {
        self.target = rng.gen_range(-cfg.range..=cfg.range);
    }
}
