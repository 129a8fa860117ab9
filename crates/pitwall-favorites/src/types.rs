use chrono::{DateTime, Utc};
use pitwall_circuits::{Category, Circuit};
use serde::{Deserialize, Serialize};

/// A starred circuit as persisted to disk.
///
/// Carries enough of the circuit record to render a list without consulting
/// the catalog, plus the moment it was starred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteCircuit {
    pub slug: String,
    pub category: Category,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub added_at: DateTime<Utc>,
}

impl FavoriteCircuit {
    /// Build a favorite from a catalog circuit, stamped now.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            slug: circuit.slug.clone(),
            category: circuit.category,
            name: circuit.name.clone(),
            country: circuit.country.clone(),
            latitude: circuit.latitude,
            longitude: circuit.longitude,
            added_at: Utc::now(),
        }
    }

    /// The (slug, category) identity used for uniqueness.
    pub fn key(&self) -> (&str, Category) {
        (&self.slug, self.category)
    }
}
