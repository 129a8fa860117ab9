//! The embedded circuit dataset and queries over it.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Category, Circuit};

/// Dataset shipped with the binary. Slugs are stable; coordinates point at
/// the venue, not the start/finish line.
const CIRCUITS_JSON: &str = include_str!("data/circuits.json");

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse circuit dataset: {0}")]
    Parse(String),

    #[error("Duplicate circuit entry: {slug} in {category}")]
    Duplicate { slug: String, category: Category },
}

/// Great-circle distance between two coordinate pairs, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// In-memory catalog of all known circuits.
#[derive(Debug, Clone)]
pub struct Catalog {
    circuits: Vec<Circuit>,
}

impl Catalog {
    /// Parse the embedded dataset.
    ///
    /// Verifies the (slug, category) uniqueness invariant so a bad dataset
    /// fails at startup rather than corrupting favorites later.
    pub fn load() -> Result<Self, CatalogError> {
        let circuits: Vec<Circuit> =
            serde_json::from_str(CIRCUITS_JSON).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut seen = HashSet::new();
        for circuit in &circuits {
            if !seen.insert((circuit.slug.clone(), circuit.category)) {
                return Err(CatalogError::Duplicate {
                    slug: circuit.slug.clone(),
                    category: circuit.category,
                });
            }
        }

        tracing::debug!("Loaded {} circuits", circuits.len());
        Ok(Self { circuits })
    }

    /// Every circuit in the dataset.
    pub fn all(&self) -> &[Circuit] {
        &self.circuits
    }

    /// Circuits belonging to a single series.
    pub fn by_category(&self, category: Category) -> Vec<&Circuit> {
        self.circuits.iter().filter(|c| c.category == category).collect()
    }

    /// Look up a circuit by its (category, slug) key.
    pub fn find(&self, category: Category, slug: &str) -> Option<&Circuit> {
        self.circuits.iter().find(|c| c.category == category && c.slug == slug)
    }

    /// Case-insensitive substring search over name and country.
    pub fn search(&self, query: &str) -> Vec<&Circuit> {
        let needle = query.to_lowercase();
        if needle.trim().is_empty() {
            return Vec::new();
        }
        self.circuits
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.country.to_lowercase().contains(&needle)
                    || c.slug.contains(&needle)
            })
            .collect()
    }

    /// The circuit closest to the given coordinates, with its distance in km.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Option<(&Circuit, f64)> {
        self.circuits
            .iter()
            .map(|c| (c, haversine_km(latitude, longitude, c.latitude, c.longitude)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
