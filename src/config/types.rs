use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub likes: LikesConfig,
}

/// Streak engine constants. Read once when an engine is spawned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Quiet time after the last event before cooldown starts (default: 300).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Time between momentum decrements during cooldown (default: 150).
    #[serde(default = "default_decay_interval_ms")]
    pub decay_interval_ms: u64,
    /// Events per doubling of the multiplier (default: 10).
    #[serde(default = "default_multiplier_period")]
    pub multiplier_period: u32,
    /// Momentum from which the streak badge is shown (default: 2).
    #[serde(default = "default_display_threshold")]
    pub display_threshold: u32,
    /// Smallest badge zoom (default: 1).
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u32,
    /// Largest badge zoom (default: 3).
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u32,
}

/// Likes counter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikesConfig {
    /// Upper bound of the counter (default: 1000).
    #[serde(default = "default_max_likes")]
    pub max_likes: i64,
    /// Value reported before anything was stored (default: 0).
    #[serde(default)]
    pub initial_likes: i64,
}

impl StreakConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn decay_interval(&self) -> Duration {
        Duration::from_millis(self.decay_interval_ms)
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_decay_interval_ms() -> u64 {
    150
}

fn default_multiplier_period() -> u32 {
    10
}

fn default_display_threshold() -> u32 {
    2
}

fn default_min_zoom() -> u32 {
    1
}

fn default_max_zoom() -> u32 {
    3
}

fn default_max_likes() -> i64 {
    1000
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            decay_interval_ms: default_decay_interval_ms(),
            multiplier_period: default_multiplier_period(),
            display_threshold: default_display_threshold(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
        }
    }
}

impl Default for LikesConfig {
    fn default() -> Self {
        Self {
            max_likes: default_max_likes(),
            initial_likes: 0,
        }
    }
}
