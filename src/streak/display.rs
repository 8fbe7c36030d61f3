//! Presentation helpers for the rendering layer.
//!
//! Nothing here feeds back into the engine; the display fields of
//! [`StreakConfig`] are only read by these functions.

use crate::config::StreakConfig;
use crate::streak::engine::StreakView;

/// Whether the streak badge should replace the plain counter.
pub fn shows_streak(view: &StreakView, config: &StreakConfig) -> bool {
    view.momentum >= config.display_threshold
}

/// Zoom level of the streak badge: one step per multiplier period, kept
/// within `[min_zoom, max_zoom]`.
pub fn zoom(view: &StreakView, config: &StreakConfig) -> u32 {
    let steps = view.momentum / config.multiplier_period.max(1);
    let range = config.max_zoom.saturating_sub(config.min_zoom);
    steps.min(range) + config.min_zoom
}

/// Progress toward `max` in percent, counting the pending buffer. Capped
/// at 100 but not floored.
pub fn progress_percent(view: &StreakView, max: i64) -> f64 {
    if max <= 0 {
        return 100.0;
    }
    (view.total() as f64 / max as f64 * 100.0).min(100.0)
}

/// Text of the center label: `x{momentum} (+{buffer})` during a visible
/// streak, `+{total}` otherwise.
pub fn label(view: &StreakView, config: &StreakConfig) -> String {
    if shows_streak(view, config) {
        format!("x{} (+{})", view.momentum, view.buffer)
    } else {
        format!("+{}", view.total())
    }
}
