//! Open-Meteo forecast client.

use std::sync::Arc;
use std::time::Duration;

use pitwall_circuits::Circuit;
use pitwall_core::{Config, UnitSystem};
use reqwest::Client;
use url::Url;

use crate::cache::ForecastCache;
use crate::response::ForecastResponse;
use crate::retry::{with_retry, RetryConfig};
use crate::types::{Forecast, WeatherError};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "pitwall/0.1.0 (https://github.com/pitwall)";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,weather_code,cloud_cover,pressure_msl,wind_speed_10m,wind_direction_10m,\
wind_gusts_10m,uv_index";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,weather_code,\
cloud_cover,wind_speed_10m,wind_direction_10m,uv_index";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,\
sunset,precipitation_probability_max";

/// Forecast client with retry and a per-circuit TTL cache.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: Url,
    units: UnitSystem,
    forecast_days: u8,
    retry: RetryConfig,
    cache: ForecastCache,
}

impl WeatherProvider {
    /// Create a provider against a specific endpoint.
    pub fn new(
        base_url: &str,
        units: UnitSystem,
        forecast_days: u8,
        cache_ttl: Duration,
    ) -> Result<Self, WeatherError> {
        let base_url = Url::parse(base_url).map_err(|e| WeatherError::Endpoint(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
            units,
            forecast_days,
            retry: RetryConfig::default(),
            cache: ForecastCache::new(cache_ttl),
        })
    }

    /// Create a provider from application configuration.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Self::new(
            &config.weather.base_url,
            config.units,
            config.weather.forecast_days,
            Duration::from_secs(u64::from(config.weather.refresh_minutes) * 60),
        )
    }

    /// Replace the retry policy (mostly for tests and scripted use).
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Forecast for a circuit, served from cache while fresh.
    ///
    /// When the upstream fetch fails and an older forecast is cached, that
    /// forecast is returned marked stale instead of surfacing the error.
    pub async fn forecast(&self, circuit: &Circuit) -> Result<Forecast, WeatherError> {
        if let Some(hit) = self.cache.get_fresh(circuit.category, &circuit.slug) {
            tracing::debug!("Cache hit for {} ({})", circuit.slug, circuit.category);
            return Ok(hit);
        }

        match self.fetch(circuit.latitude, circuit.longitude).await {
            Ok(forecast) => {
                self.cache.insert(circuit.category, &circuit.slug, forecast.clone());
                Ok(forecast)
            }
            Err(e) => match self.cache.get_any(circuit.category, &circuit.slug) {
                Some(stale) => {
                    tracing::warn!(
                        "Serving last-known forecast for {} after fetch failure: {}",
                        circuit.slug,
                        e
                    );
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }

    /// Fetch a forecast for arbitrary coordinates, bypassing the cache.
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Forecast, WeatherError> {
        let url = self.endpoint(latitude, longitude)?;
        tracing::debug!("Fetching forecast for {:.4},{:.4}", latitude, longitude);

        let response = with_retry(&self.retry, || {
            let client = self.client.clone();
            let url = url.clone();
            async move { client.get(url).send().await }
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let forecast = parsed.into_forecast(self.units)?;
        tracing::info!(
            "Fetched forecast: {} hourly / {} daily entries",
            forecast.hourly.len(),
            forecast.daily.len()
        );
        Ok(forecast)
    }

    fn endpoint(&self, latitude: f64, longitude: f64) -> Result<Url, WeatherError> {
        let mut url = self
            .base_url
            .join("v1/forecast")
            .map_err(|e| WeatherError::Endpoint(e.to_string()))?;

        let (temperature_unit, wind_speed_unit) = match self.units {
            UnitSystem::Metric => ("celsius", "kmh"),
            UnitSystem::Imperial => ("fahrenheit", "mph"),
        };

        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("current", CURRENT_FIELDS)
            .append_pair("hourly", HOURLY_FIELDS)
            .append_pair("daily", DAILY_FIELDS)
            .append_pair("timezone", "auto")
            .append_pair("forecast_days", &self.forecast_days.to_string())
            .append_pair("temperature_unit", temperature_unit)
            .append_pair("wind_speed_unit", wind_speed_unit);

        Ok(url)
    }
}
