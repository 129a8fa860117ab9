use serde::{Deserialize, Serialize};

/// Racing series a circuit entry belongs to.
///
/// The same venue can appear under several categories (e.g. Silverstone runs
/// both F1 and F2/F3 rounds); entries are keyed by (slug, category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    F1,
    F2F3,
    MotoGp,
    IndyCar,
    Nascar,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::F1,
        Category::F2F3,
        Category::MotoGp,
        Category::IndyCar,
        Category::Nascar,
    ];

    /// Display label matching how the series brands itself.
    pub fn label(&self) -> &'static str {
        match self {
            Category::F1 => "F1",
            Category::F2F3 => "F2/F3",
            Category::MotoGp => "MotoGP",
            Category::IndyCar => "IndyCar",
            Category::Nascar => "NASCAR",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f1" | "formula1" | "formula-1" => Ok(Category::F1),
            "f2f3" | "f2" | "f3" | "f2/f3" => Ok(Category::F2F3),
            "motogp" | "moto-gp" => Ok(Category::MotoGp),
            "indycar" | "indy" => Ok(Category::IndyCar),
            "nascar" => Ok(Category::Nascar),
            other => Err(format!(
                "unknown category '{}' (expected f1, f2f3, motogp, indycar, or nascar)",
                other
            )),
        }
    }
}

/// A motorsport venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// Stable kebab-case identifier, unique within a category
    pub slug: String,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Compass bearing of the main straight in degrees, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_bearing: Option<f64>,
    pub category: Category,
}

impl Circuit {
    /// Coordinates as a (latitude, longitude) pair.
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
