//! Reward economy configuration snapshot.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_FREE_PLAYS, DEFAULT_MAX_AD_VIEWS, DEFAULT_MAX_SHARE_REWARDS, DEFAULT_PLAYS_PER_AD,
    DEFAULT_PLAYS_PER_SHARE,
};

/// Operator-tuned daily play allowances and reward batch sizes.
///
/// The ledger reads this exactly once per session start and treats it as
/// immutable for the lifetime of the session. Fields missing from a stored
/// or fetched document fall back to the built-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Attempts granted on a fresh day.
    #[serde(default = "RewardConfig::default_free_plays")]
    pub free_plays: u32,
    /// Attempts granted per completed ad watch.
    #[serde(default = "RewardConfig::default_plays_per_ad")]
    pub plays_per_ad: u32,
    /// Attempts granted per completed share.
    #[serde(default = "RewardConfig::default_plays_per_share")]
    pub plays_per_share: u32,
    /// Daily cap on ad-reward grants.
    #[serde(default = "RewardConfig::default_max_ad_views")]
    pub max_ad_views: u32,
    /// Daily cap on share-reward grants.
    #[serde(default = "RewardConfig::default_max_share_rewards")]
    pub max_share_rewards: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            free_plays: Self::default_free_plays(),
            plays_per_ad: Self::default_plays_per_ad(),
            plays_per_share: Self::default_plays_per_share(),
            max_ad_views: Self::default_max_ad_views(),
            max_share_rewards: Self::default_max_share_rewards(),
        }
    }
}

impl RewardConfig {
    #[must_use]
    pub const fn default_free_plays() -> u32 {
        DEFAULT_FREE_PLAYS
    }

    #[must_use]
    pub const fn default_plays_per_ad() -> u32 {
        DEFAULT_PLAYS_PER_AD
    }

    #[must_use]
    pub const fn default_plays_per_share() -> u32 {
        DEFAULT_PLAYS_PER_SHARE
    }

    #[must_use]
    pub const fn default_max_ad_views() -> u32 {
        DEFAULT_MAX_AD_VIEWS
    }

    #[must_use]
    pub const fn default_max_share_rewards() -> u32 {
        DEFAULT_MAX_SHARE_REWARDS
    }

    /// Check the documented bounds without mutating the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RewardConfigError` when a reward batch size is zero; a zero
    /// batch would let a capped reward path grant nothing while still
    /// consuming the daily allowance.
    pub const fn validate(&self) -> Result<(), RewardConfigError> {
        if self.plays_per_ad == 0 {
            return Err(RewardConfigError::MinViolation {
                field: "plays_per_ad",
                min: 1,
                value: 0,
            });
        }
        if self.plays_per_share == 0 {
            return Err(RewardConfigError::MinViolation {
                field: "plays_per_share",
                min: 1,
                value: 0,
            });
        }
        Ok(())
    }

    /// Clamp out-of-bounds fields instead of rejecting the snapshot.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.plays_per_ad = self.plays_per_ad.max(1);
        self.plays_per_share = self.plays_per_share.max(1);
        self
    }

    /// Total attempts a player can possibly earn in one day.
    #[must_use]
    pub const fn total_attempts_available(&self) -> u32 {
        self.free_plays
            + self.max_ad_views * self.plays_per_ad
            + self.max_share_rewards * self.plays_per_share
    }
}

/// Validation failure for a reward configuration snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RewardConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u32,
        value: u32,
    },
}
