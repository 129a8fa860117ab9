//! Process-local forecast cache.
//!
//! Weather readings are never written to disk; this cache only spares the
//! API within a session and keeps the last good forecast available as a
//! stale fallback when a refresh fails.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use pitwall_circuits::Category;

use crate::types::Forecast;

#[derive(Debug, Clone)]
struct CacheEntry {
    forecast: Forecast,
    stored_at: Instant,
}

/// TTL cache of forecasts keyed by (category, slug).
#[derive(Debug, Clone)]
pub struct ForecastCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<(Category, String), CacheEntry>>>,
}

impl ForecastCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store the latest forecast for a circuit.
    pub fn insert(&self, category: Category, slug: &str, forecast: Forecast) {
        let mut entries = self.entries.lock();
        entries.insert(
            (category, slug.to_string()),
            CacheEntry {
                forecast,
                stored_at: Instant::now(),
            },
        );
    }

    /// A forecast still inside its freshness window, if any.
    pub fn get_fresh(&self, category: Category, slug: &str) -> Option<Forecast> {
        let entries = self.entries.lock();
        let entry = entries.get(&(category, slug.to_string()))?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.forecast.clone())
        } else {
            None
        }
    }

    /// The last stored forecast regardless of age, marked stale when past
    /// its window. Used as the degraded path after a failed refresh.
    pub fn get_any(&self, category: Category, slug: &str) -> Option<Forecast> {
        let entries = self.entries.lock();
        let entry = entries.get(&(category, slug.to_string()))?;
        let mut forecast = entry.forecast.clone();
        forecast.stale = entry.stored_at.elapsed() >= self.ttl;
        Some(forecast)
    }

    /// Drop every cached forecast.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::{CurrentConditions, WeatherCondition};
    use chrono::{NaiveDate, Utc};
    use pitwall_core::UnitSystem;

    fn sample_forecast() -> Forecast {
        Forecast {
            current: CurrentConditions {
                temperature: 21.0,
                feels_like: 20.0,
                humidity: 55,
                pressure_hpa: 1013.0,
                wind_speed: 12.0,
                wind_direction: 200.0,
                wind_gusts: None,
                cloud_cover: 25.0,
                uv_index: 4.0,
                precipitation: 0.0,
                condition: WeatherCondition::PartlyCloudy,
                observed_at: NaiveDate::from_ymd_opt(2026, 8, 6)
                    .unwrap()
                    .and_hms_opt(14, 0, 0)
                    .unwrap(),
            },
            hourly: Vec::new(),
            daily: Vec::new(),
            units: UnitSystem::Metric,
            fetched_at: Utc::now(),
            stale: false,
        }
    }

    #[test]
    fn test_fresh_hit_within_ttl() {
        let cache = ForecastCache::new(Duration::from_secs(60));
        cache.insert(Category::F1, "spa", sample_forecast());

        let hit = cache.get_fresh(Category::F1, "spa");
        assert!(hit.is_some());
        assert!(!hit.map(|f| f.stale).unwrap_or(true));
    }

    #[test]
    fn test_miss_on_other_key() {
        let cache = ForecastCache::new(Duration::from_secs(60));
        cache.insert(Category::F1, "spa", sample_forecast());

        assert!(cache.get_fresh(Category::F1, "monza").is_none());
        assert!(cache.get_fresh(Category::F2F3, "spa").is_none());
    }

    #[test]
    fn test_expired_entry_not_fresh_but_available_stale() {
        let cache = ForecastCache::new(Duration::ZERO);
        cache.insert(Category::F1, "spa", sample_forecast());

        assert!(cache.get_fresh(Category::F1, "spa").is_none());

        let stale = cache.get_any(Category::F1, "spa").unwrap();
        assert!(stale.stale);
        assert!((stale.current.temperature - 21.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clear() {
        let cache = ForecastCache::new(Duration::from_secs(60));
        cache.insert(Category::F1, "spa", sample_forecast());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
