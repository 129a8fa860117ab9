//! Heuristic estimate of track-surface temperature.
//!
//! Asphalt heats well past air temperature under direct sun and sheds heat
//! overnight. The estimate adds a UV-driven solar term damped by cloud
//! cover, subtracts a capped wind-cooling term, and applies a fixed
//! radiative offset after dark.

use chrono::{NaiveTime, Timelike};
use pitwall_core::UnitSystem;
use serde::Serialize;

// Metric coefficients; imperial variants are the same physics expressed in
// °F and mph.
const UV_GAIN_C: f64 = 2.0;
const CLOUD_DAMPING: f64 = 0.75;
const WIND_COOLING_PER_KMH: f64 = 0.5;
const WIND_COOLING_CAP_C: f64 = 5.0;
const NIGHT_OFFSET_C: f64 = 3.0;
const TRACK_TEMP_MIN_C: f64 = -20.0;
const TRACK_TEMP_MAX_C: f64 = 70.0;

const UV_GAIN_F: f64 = 3.6;
const WIND_COOLING_PER_MPH: f64 = 1.45;
const WIND_COOLING_CAP_F: f64 = 9.0;
const NIGHT_OFFSET_F: f64 = 5.4;
const TRACK_TEMP_MIN_F: f64 = -4.0;
const TRACK_TEMP_MAX_F: f64 = 158.0;

// Fallback daylight window when sunrise/sunset are unknown
const FALLBACK_DAY_START: u32 = 6;
const FALLBACK_DAY_END: u32 = 20;

/// Weather readings feeding the estimate. Temperatures and wind speed are in
/// the unit system passed to [`estimate_track_temperature`].
#[derive(Debug, Clone, Copy)]
pub struct TrackTempInput {
    pub air_temperature: f64,
    pub uv_index: f64,
    /// Cloud cover percentage, 0-100
    pub cloud_cover: f64,
    pub wind_speed: f64,
    /// Local time of the observation
    pub observed_at: NaiveTime,
    pub sunrise: Option<NaiveTime>,
    pub sunset: Option<NaiveTime>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrackTempEstimate {
    pub track_temperature: f64,
    pub daytime: bool,
}

fn is_daytime(observed_at: NaiveTime, sunrise: Option<NaiveTime>, sunset: Option<NaiveTime>) -> bool {
    match (sunrise, sunset) {
        (Some(rise), Some(set)) => observed_at >= rise && observed_at < set,
        _ => {
            let hour = observed_at.hour();
            (FALLBACK_DAY_START..FALLBACK_DAY_END).contains(&hour)
        }
    }
}

/// Estimate track-surface temperature from weather readings.
///
/// Total over all inputs: UV, cloud cover, and wind speed are clamped to
/// their physical ranges before use, and the result is clamped to
/// [-20, 70] °C (or the Fahrenheit equivalent).
pub fn estimate_track_temperature(input: &TrackTempInput, units: UnitSystem) -> TrackTempEstimate {
    let (uv_gain, wind_coef, wind_cap, night_offset, min, max) = match units {
        UnitSystem::Metric => (
            UV_GAIN_C,
            WIND_COOLING_PER_KMH,
            WIND_COOLING_CAP_C,
            NIGHT_OFFSET_C,
            TRACK_TEMP_MIN_C,
            TRACK_TEMP_MAX_C,
        ),
        UnitSystem::Imperial => (
            UV_GAIN_F,
            WIND_COOLING_PER_MPH,
            WIND_COOLING_CAP_F,
            NIGHT_OFFSET_F,
            TRACK_TEMP_MIN_F,
            TRACK_TEMP_MAX_F,
        ),
    };

    let uv = input.uv_index.max(0.0);
    let cloud_fraction = (input.cloud_cover.clamp(0.0, 100.0)) / 100.0;
    let wind = input.wind_speed.max(0.0);

    let daytime = is_daytime(input.observed_at, input.sunrise, input.sunset);

    let raw = if daytime {
        let solar = uv_gain * uv * (1.0 - CLOUD_DAMPING * cloud_fraction);
        let cooling = (wind_coef * wind).min(wind_cap);
        input.air_temperature + solar - cooling
    } else {
        input.air_temperature - night_offset
    };

    TrackTempEstimate {
        track_temperature: raw.clamp(min, max),
        daytime,
    }
}
