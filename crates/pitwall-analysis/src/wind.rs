//! Wind vector decomposition relative to a track's main straight.
//!
//! Wind direction uses the meteorological convention (degrees the wind blows
//! FROM); the track bearing is the compass heading cars travel along the
//! straight. A wind blowing from dead ahead is a pure headwind.

use serde::Serialize;

/// Below this speed the wind is reported as calm regardless of direction.
/// The threshold is in the caller's unit system (km/h or mph).
pub const CALM_THRESHOLD: f64 = 5.0;

const HEADWIND_CONE_DEG: f64 = 45.0;
const TAILWIND_CONE_DEG: f64 = 135.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindClass {
    Calm,
    Headwind,
    Tailwind,
    Crosswind,
}

impl WindClass {
    pub fn label(&self) -> &'static str {
        match self {
            WindClass::Calm => "Calm",
            WindClass::Headwind => "Headwind",
            WindClass::Tailwind => "Tailwind",
            WindClass::Crosswind => "Crosswind",
        }
    }
}

impl std::fmt::Display for WindClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Wind resolved into components along and across the main straight.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WindComponents {
    /// Signed angle between wind direction and track bearing, in [-180, 180]
    pub angle_diff: f64,
    /// Along-track component; positive is headwind, negative tailwind
    pub headwind: f64,
    /// Across-track component, always non-negative
    pub crosswind: f64,
    pub class: WindClass,
}

/// Normalize an angle in degrees to [0, 360).
fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed angular difference between wind direction and track bearing,
/// normalized to [-180, 180].
pub fn signed_angle_diff(wind_direction: f64, track_bearing: f64) -> f64 {
    let diff = normalize_degrees(wind_direction) - normalize_degrees(track_bearing);
    if diff > 180.0 {
        diff - 360.0
    } else if diff < -180.0 {
        diff + 360.0
    } else {
        diff
    }
}

/// Resolve wind speed/direction into track-relative components.
///
/// Total over all inputs: speeds below zero are treated as zero, angles
/// outside [0, 360) wrap.
pub fn decompose_wind(speed: f64, wind_direction: f64, track_bearing: f64) -> WindComponents {
    let speed = speed.max(0.0);
    let angle_diff = signed_angle_diff(wind_direction, track_bearing);
    let radians = angle_diff.to_radians();

    let headwind = speed * radians.cos();
    let crosswind = (speed * radians.sin()).abs();

    let class = if speed < CALM_THRESHOLD {
        WindClass::Calm
    } else if angle_diff.abs() <= HEADWIND_CONE_DEG {
        WindClass::Headwind
    } else if angle_diff.abs() >= TAILWIND_CONE_DEG {
        WindClass::Tailwind
    } else {
        WindClass::Crosswind
    };

    WindComponents {
        angle_diff,
        headwind,
        crosswind,
        class,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_aligned_wind_is_pure_headwind() {
        for bearing in [0.0, 45.0, 137.5, 270.0, 359.0] {
            let w = decompose_wind(30.0, bearing, bearing);
            assert!((w.headwind - 30.0).abs() < EPS, "bearing {}", bearing);
            assert!(w.crosswind < EPS, "bearing {}", bearing);
            assert_eq!(w.class, WindClass::Headwind);
        }
    }

    #[test]
    fn test_opposed_wind_is_pure_tailwind() {
        let w = decompose_wind(30.0, 180.0, 0.0);
        assert!((w.headwind + 30.0).abs() < EPS);
        assert!(w.crosswind < 1e-6);
        assert_eq!(w.class, WindClass::Tailwind);
    }

    #[test]
    fn test_perpendicular_wind_is_pure_crosswind() {
        let w = decompose_wind(20.0, 90.0, 0.0);
        assert!(w.headwind.abs() < 1e-6);
        assert!((w.crosswind - 20.0).abs() < EPS);
        assert_eq!(w.class, WindClass::Crosswind);

        // Both sides of the track behave the same
        let w = decompose_wind(20.0, 270.0, 0.0);
        assert!((w.crosswind - 20.0).abs() < EPS);
        assert_eq!(w.class, WindClass::Crosswind);
    }

    #[test]
    fn test_calm_below_threshold_regardless_of_direction() {
        for direction in [0.0, 90.0, 180.0, 270.0] {
            let w = decompose_wind(4.9, direction, 0.0);
            assert_eq!(w.class, WindClass::Calm, "direction {}", direction);
        }
        // Exactly at the threshold the wind counts
        assert_eq!(decompose_wind(5.0, 0.0, 0.0).class, WindClass::Headwind);
    }

    #[test]
    fn test_classification_cone_boundaries() {
        assert_eq!(decompose_wind(10.0, 45.0, 0.0).class, WindClass::Headwind);
        assert_eq!(decompose_wind(10.0, 46.0, 0.0).class, WindClass::Crosswind);
        assert_eq!(decompose_wind(10.0, 134.0, 0.0).class, WindClass::Crosswind);
        assert_eq!(decompose_wind(10.0, 135.0, 0.0).class, WindClass::Tailwind);

        // Mirrored on the negative side
        assert_eq!(decompose_wind(10.0, 315.0, 0.0).class, WindClass::Headwind);
        assert_eq!(decompose_wind(10.0, 225.0, 0.0).class, WindClass::Tailwind);
    }

    #[test]
    fn test_angle_diff_normalization() {
        assert!((signed_angle_diff(350.0, 10.0) - (-20.0)).abs() < EPS);
        assert!((signed_angle_diff(10.0, 350.0) - 20.0).abs() < EPS);
        assert!((signed_angle_diff(0.0, 180.0) - (-180.0)).abs() < EPS);
        // Inputs outside [0, 360) wrap instead of erroring
        assert!((signed_angle_diff(370.0, -10.0) - 20.0).abs() < EPS);
    }

    #[test]
    fn test_negative_speed_treated_as_zero() {
        let w = decompose_wind(-3.0, 90.0, 0.0);
        assert!(w.headwind.abs() < EPS);
        assert!(w.crosswind.abs() < EPS);
        assert_eq!(w.class, WindClass::Calm);
    }

    #[test]
    fn test_components_obey_pythagoras() {
        let w = decompose_wind(37.0, 123.0, 71.0);
        let magnitude = (w.headwind.powi(2) + w.crosswind.powi(2)).sqrt();
        assert!((magnitude - 37.0).abs() < 1e-6);
    }
}
