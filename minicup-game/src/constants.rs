//! Centralized balance and tuning constants for MiniCup game logic.
//!
//! These values define the deterministic math for the core game. Keeping
//! them together ensures gameplay can only be adjusted via code changes
//! reviewed in version control, or through the operator-facing
//! `RewardConfig` snapshot where the product requires runtime tuning.

// Reward economy fallbacks -------------------------------------------------
// Used whenever the configuration provider is unreachable or returns
// malformed data.
pub(crate) const DEFAULT_FREE_PLAYS: u32 = 2;
pub(crate) const DEFAULT_PLAYS_PER_AD: u32 = 2;
pub(crate) const DEFAULT_PLAYS_PER_SHARE: u32 = 2;
pub(crate) const DEFAULT_MAX_AD_VIEWS: u32 = 5;
pub(crate) const DEFAULT_MAX_SHARE_REWARDS: u32 = 3;

// Goal-mouth geometry ------------------------------------------------------
// Horizontal coordinates are normalized: 0.0 is the center of the goal,
// posts sit at +/- GOAL_POST_SPAN. The keeper wanders inside a slightly
// narrower band so it can never idle flush against a post.
pub(crate) const GOAL_POST_SPAN: f32 = 1.0;
pub(crate) const KEEPER_WANDER_RANGE: f32 = 0.85;

// Keeper motion tuning (continuous-aim mechanic) ---------------------------
pub(crate) const KEEPER_BASE_SPEED: f32 = 0.9;
pub(crate) const KEEPER_SPEED_PER_DIFFICULTY: f32 = 0.25;
pub(crate) const KEEPER_RETARGET_BASE_RATE: f32 = 0.6;
pub(crate) const KEEPER_RETARGET_PER_DIFFICULTY: f32 = 0.3;
/// Keeper position is considered on-target within this distance.
pub(crate) const KEEPER_ARRIVAL_EPSILON: f32 = 0.01;

// Save radius rubber band (continuous-aim mechanic) ------------------------
// The radius shrinks as difficulty rises: keeper motion gets faster and
// less predictable while the hit tolerance widens.
pub(crate) const SAVE_RADIUS_BASE: f32 = 0.42;
pub(crate) const SAVE_RADIUS_DECAY: f32 = 0.03;
pub(crate) const SAVE_RADIUS_MIN: f32 = 0.12;

// Difficulty ---------------------------------------------------------------
pub(crate) const DIFFICULTY_BASE: f32 = 1.0;
pub(crate) const DIFFICULTY_STEP_PER_GOAL: f32 = 0.5;
