//! Orientation normalization and the glare predicate.
//!
//! Both functions are pure. Angles are in degrees; azimuth and normalized
//! orientation use the compass convention (clockwise from true north).

use crate::constants::{DEFAULT_ALTITUDE_CEILING, DEFAULT_AZIMUTH_WINDOW};

/// Map a signed orientation in `[-180, 180]` onto `[0, 360)`.
///
/// Negative values are shifted by a full turn, everything else passes
/// through. Both `-180` and `180` come out as `180` (due south).
pub fn normalize_orientation(orientation: f64) -> f64 {
    if orientation < 0.0 {
        let shifted = orientation + 360.0;
        // Negatives smaller than half an ulp of 360 round up to a full turn
        if shifted >= 360.0 { 0.0 } else { shifted }
    } else {
        orientation
    }
}

/// Thresholds of the glare predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlareRule {
    /// Upper bound (exclusive) on `azimuth - orientation`, degrees
    pub azimuth_window: f64,
    /// Upper bound (exclusive) on solar altitude, degrees
    pub altitude_ceiling: f64,
}

impl Default for GlareRule {
    fn default() -> Self {
        Self {
            azimuth_window: DEFAULT_AZIMUTH_WINDOW,
            altitude_ceiling: DEFAULT_ALTITUDE_CEILING,
        }
    }
}

impl GlareRule {
    /// Apply the predicate.
    ///
    /// Glare requires both:
    /// 1. `azimuth - normalized_orientation < azimuth_window`
    /// 2. `altitude < altitude_ceiling`
    ///
    /// The first test is a plain signed difference with no wraparound: a sun
    /// far *behind* the direction of travel (azimuth 10°, orientation 350°,
    /// difference -340°) passes it. This matches the reference behavior and
    /// must not be turned into an absolute angular distance.
    pub fn classify(&self, azimuth: f64, altitude: f64, normalized_orientation: f64) -> bool {
        azimuth - normalized_orientation < self.azimuth_window && altitude < self.altitude_ceiling
    }
}

/// [`GlareRule::classify`] with the default 30° window and 45° ceiling.
pub fn classify(azimuth: f64, altitude: f64, normalized_orientation: f64) -> bool {
    GlareRule::default().classify(azimuth, altitude, normalized_orientation)
}
