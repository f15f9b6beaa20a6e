//! Congestion classification from travel time delay

use crate::models::CongestionLevel;

/// Delay-to-baseline ratio at or above which traffic is heavy
pub const HEAVY_RATIO: f64 = 0.5;
/// Delay-to-baseline ratio at or above which traffic is moderate
pub const MODERATE_RATIO: f64 = 0.2;
/// Absolute delay that is heavy on any route
pub const HEAVY_DELAY_SECONDS: f64 = 15.0 * 60.0;
/// Absolute delay that is at least moderate on any route
pub const MODERATE_DELAY_SECONDS: f64 = 5.0 * 60.0;

/// Classify a route's congestion.
///
/// `delay_seconds` is live minus free-flow travel time and is treated as zero
/// when negative. `baseline_seconds` is the free-flow travel time; when it is
/// not positive no ratio exists and any delay short of the heavy threshold is
/// moderate.
#[must_use]
pub fn classify(delay_seconds: f64, baseline_seconds: f64) -> CongestionLevel {
    let delay = delay_seconds.max(0.0);

    if delay <= 0.0 {
        return CongestionLevel::Clear;
    }
    if delay >= HEAVY_DELAY_SECONDS {
        return CongestionLevel::Heavy;
    }
    if baseline_seconds <= 0.0 {
        return CongestionLevel::Moderate;
    }

    let ratio = delay / baseline_seconds;
    if ratio >= HEAVY_RATIO {
        CongestionLevel::Heavy
    } else if ratio >= MODERATE_RATIO || delay >= MODERATE_DELAY_SECONDS {
        CongestionLevel::Moderate
    } else {
        CongestionLevel::Clear
    }
}
