//! Integration tests for WeatherProvider using wiremock.
//!
//! These tests verify request construction, response parsing, and the
//! cache/stale-fallback behavior against a mock HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use pitwall_circuits::{Category, Circuit};
use pitwall_core::UnitSystem;
use pitwall_weather::{RetryConfig, WeatherCondition, WeatherError, WeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn spa() -> Circuit {
    Circuit {
        slug: "spa".to_string(),
        name: "Circuit de Spa-Francorchamps".to_string(),
        country: "Belgium".to_string(),
        latitude: 50.4372,
        longitude: 5.9714,
        track_bearing: Some(210.0),
        category: Category::F1,
    }
}

fn sample_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": 50.4372,
        "longitude": 5.9714,
        "timezone": "Europe/Brussels",
        "current": {
            "time": "2026-08-06T14:00",
            "temperature_2m": 19.4,
            "relative_humidity_2m": 77.0,
            "apparent_temperature": 18.1,
            "precipitation": 0.2,
            "weather_code": 61,
            "cloud_cover": 90.0,
            "pressure_msl": 1009.3,
            "wind_speed_10m": 14.0,
            "wind_direction_10m": 225.0,
            "wind_gusts_10m": 31.0,
            "uv_index": 2.5
        },
        "hourly": {
            "time": ["2026-08-06T14:00", "2026-08-06T15:00"],
            "temperature_2m": [19.4, 19.9],
            "precipitation_probability": [65.0, 40.0],
            "weather_code": [61, 3],
            "cloud_cover": [90.0, 70.0],
            "wind_speed_10m": [14.0, 12.0],
            "wind_direction_10m": [225.0, 230.0],
            "uv_index": [2.5, 2.0]
        },
        "daily": {
            "time": ["2026-08-06"],
            "weather_code": [61],
            "temperature_2m_max": [21.0],
            "temperature_2m_min": [12.5],
            "sunrise": ["2026-08-06T06:14"],
            "sunset": ["2026-08-06T21:12"],
            "precipitation_probability_max": [70.0]
        }
    })
}

fn provider(uri: &str, units: UnitSystem) -> WeatherProvider {
    WeatherProvider::new(uri, units, 3, Duration::from_secs(300))
        .unwrap()
        .with_retry_config(RetryConfig::none())
}

#[tokio::test]
async fn test_fetch_parses_full_forecast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server.uri(), UnitSystem::Metric);
    let forecast = provider.fetch(50.4372, 5.9714).await.unwrap();

    assert!((forecast.current.temperature - 19.4).abs() < f64::EPSILON);
    assert_eq!(forecast.current.humidity, 77);
    assert_eq!(forecast.current.condition, WeatherCondition::Rain);
    assert_eq!(forecast.current.wind_gusts, Some(31.0));

    assert_eq!(forecast.hourly.len(), 2);
    assert_eq!(forecast.hourly[0].precipitation_chance, 65);
    assert_eq!(forecast.hourly[1].condition, WeatherCondition::Cloudy);

    assert_eq!(forecast.daily.len(), 1);
    let day = &forecast.daily[0];
    assert!((day.high - 21.0).abs() < f64::EPSILON);
    assert_eq!(day.precipitation_chance, 70);
    assert_eq!(day.sunrise.format("%H:%M").to_string(), "06:14");

    assert!(!forecast.stale);

    // Sun times resolve against the observation date
    let (sunrise, sunset) = forecast.sun_times();
    assert!(sunrise.is_some());
    assert_eq!(sunset.map(|t| t.format("%H:%M").to_string()).as_deref(), Some("21:12"));
}

#[tokio::test]
async fn test_request_carries_unit_system() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .and(query_param("wind_speed_unit", "mph"))
        .and(query_param("timezone", "auto"))
        .and(query_param("forecast_days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server.uri(), UnitSystem::Imperial);
    let forecast = provider.fetch(50.4372, 5.9714).await.unwrap();
    assert_eq!(forecast.units, UnitSystem::Imperial);
}

#[tokio::test]
async fn test_http_error_surfaces_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such endpoint"))
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server.uri(), UnitSystem::Metric);
    let result = provider.fetch(50.4372, 5.9714).await;

    match result {
        Err(WeatherError::Api { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_after_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server.uri(), UnitSystem::Metric);
    let result = provider.fetch(50.4372, 5.9714).await;

    assert!(matches!(result, Err(WeatherError::Api { status: 503, .. })));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server.uri(), UnitSystem::Metric);
    let result = provider.fetch(50.4372, 5.9714).await;

    assert!(matches!(result, Err(WeatherError::Parse(_))));
}

#[tokio::test]
async fn test_forecast_served_from_cache_while_fresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server.uri(), UnitSystem::Metric);
    let circuit = spa();

    let first = provider.forecast(&circuit).await.unwrap();
    let second = provider.forecast(&circuit).await.unwrap();

    assert_eq!(first.current.humidity, second.current.humidity);
    // expect(1) verifies the second call never reached the server
}

#[tokio::test]
async fn test_stale_fallback_after_fetch_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
        .mount(&mock_server)
        .await;

    // Zero TTL: every cached entry is immediately stale
    let provider = WeatherProvider::new(&mock_server.uri(), UnitSystem::Metric, 3, Duration::ZERO)
        .unwrap()
        .with_retry_config(RetryConfig::none());
    let circuit = spa();

    let first = provider.forecast(&circuit).await.unwrap();
    assert!(!first.stale);

    // Upstream goes dark; the provider degrades to the last-known forecast
    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let degraded = provider.forecast(&circuit).await.unwrap();
    assert!(degraded.stale);
    assert_eq!(degraded.current.humidity, first.current.humidity);
}

#[tokio::test]
async fn test_no_cache_and_failed_fetch_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server.uri(), UnitSystem::Metric);
    let result = provider.forecast(&spa()).await;

    assert!(result.is_err());
}
