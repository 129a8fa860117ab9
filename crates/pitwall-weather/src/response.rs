//! Raw Open-Meteo response shapes and their conversion into domain types.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use pitwall_core::UnitSystem;
use serde::Deserialize;

use crate::types::{
    CurrentConditions, DayForecast, Forecast, HourlyForecast, WeatherCondition, WeatherError,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    current: CurrentBlock,
    hourly: HourlyBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    precipitation: f64,
    weather_code: i32,
    cloud_cover: f64,
    pressure_msl: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    wind_gusts_10m: Option<f64>,
    uv_index: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    #[serde(default)]
    precipitation_probability: Option<Vec<Option<f64>>>,
    weather_code: Vec<i32>,
    cloud_cover: Vec<f64>,
    wind_speed_10m: Vec<f64>,
    wind_direction_10m: Vec<f64>,
    #[serde(default)]
    uv_index: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
    #[serde(default)]
    precipitation_probability_max: Option<Vec<Option<f64>>>,
}

/// Open-Meteo emits local timestamps without seconds ("2026-08-06T14:00"),
/// but keep accepting the seconds form.
fn parse_local_datetime(value: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| WeatherError::Parse(format!("bad timestamp '{}': {}", value, e)))
}

fn parse_date(value: &str) -> Result<NaiveDate, WeatherError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| WeatherError::Parse(format!("bad date '{}': {}", value, e)))
}

fn probability_at(probabilities: &Option<Vec<Option<f64>>>, index: usize) -> u8 {
    probabilities
        .as_ref()
        .and_then(|p| p.get(index).copied().flatten())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0) as u8
}

impl ForecastResponse {
    pub(crate) fn into_forecast(self, units: UnitSystem) -> Result<Forecast, WeatherError> {
        let current = CurrentConditions {
            temperature: self.current.temperature_2m,
            feels_like: self.current.apparent_temperature,
            humidity: self.current.relative_humidity_2m.clamp(0.0, 100.0) as u8,
            pressure_hpa: self.current.pressure_msl,
            wind_speed: self.current.wind_speed_10m,
            wind_direction: self.current.wind_direction_10m,
            wind_gusts: self.current.wind_gusts_10m,
            cloud_cover: self.current.cloud_cover,
            uv_index: self.current.uv_index.unwrap_or(0.0),
            precipitation: self.current.precipitation,
            condition: WeatherCondition::from_wmo_code(self.current.weather_code),
            observed_at: parse_local_datetime(&self.current.time)?,
        };

        let hourly_len = self.hourly.time.len();
        if self.hourly.temperature_2m.len() != hourly_len
            || self.hourly.weather_code.len() != hourly_len
            || self.hourly.cloud_cover.len() != hourly_len
            || self.hourly.wind_speed_10m.len() != hourly_len
            || self.hourly.wind_direction_10m.len() != hourly_len
        {
            return Err(WeatherError::Parse("hourly array length mismatch".into()));
        }

        let mut hourly = Vec::with_capacity(hourly_len);
        for i in 0..hourly_len {
            hourly.push(HourlyForecast {
                time: parse_local_datetime(&self.hourly.time[i])?,
                temperature: self.hourly.temperature_2m[i],
                precipitation_chance: probability_at(&self.hourly.precipitation_probability, i),
                condition: WeatherCondition::from_wmo_code(self.hourly.weather_code[i]),
                wind_speed: self.hourly.wind_speed_10m[i],
                wind_direction: self.hourly.wind_direction_10m[i],
                cloud_cover: self.hourly.cloud_cover[i],
                uv_index: self
                    .hourly
                    .uv_index
                    .as_ref()
                    .and_then(|u| u.get(i).copied().flatten())
                    .unwrap_or(0.0),
            });
        }

        let daily_len = self.daily.time.len();
        if self.daily.weather_code.len() != daily_len
            || self.daily.temperature_2m_max.len() != daily_len
            || self.daily.temperature_2m_min.len() != daily_len
            || self.daily.sunrise.len() != daily_len
            || self.daily.sunset.len() != daily_len
        {
            return Err(WeatherError::Parse("daily array length mismatch".into()));
        }

        let mut daily = Vec::with_capacity(daily_len);
        for i in 0..daily_len {
            daily.push(DayForecast {
                date: parse_date(&self.daily.time[i])?,
                high: self.daily.temperature_2m_max[i],
                low: self.daily.temperature_2m_min[i],
                condition: WeatherCondition::from_wmo_code(self.daily.weather_code[i]),
                precipitation_chance: probability_at(&self.daily.precipitation_probability_max, i),
                sunrise: parse_local_datetime(&self.daily.sunrise[i])?.time(),
                sunset: parse_local_datetime(&self.daily.sunset[i])?.time(),
            });
        }

        Ok(Forecast {
            current,
            hourly,
            daily,
            units,
            fetched_at: Utc::now(),
            stale: false,
        })
    }
}
