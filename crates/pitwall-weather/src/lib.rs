//! Weather service for Pitwall
//!
//! Fetches current conditions and forecasts from the Open-Meteo API for a
//! circuit's coordinates, with bounded retries and a process-local cache
//! that keeps the last good reading available when the network is not.

pub mod cache;
pub mod provider;
mod response;
pub mod retry;
pub mod types;

pub use cache::ForecastCache;
pub use provider::WeatherProvider;
pub use retry::RetryConfig;
pub use types::*;
