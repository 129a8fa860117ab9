//! Track-side weather analysis for Pitwall
//!
//! Pure functions resolving raw weather readings into quantities race
//! engineers care about: wind components relative to the main straight and
//! an estimate of asphalt surface temperature.

pub mod track_temp;
pub mod wind;

pub use track_temp::{estimate_track_temperature, TrackTempEstimate, TrackTempInput};
pub use wind::{decompose_wind, signed_angle_diff, WindClass, WindComponents};
