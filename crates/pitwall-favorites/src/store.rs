//! JSON-file-backed favorites store.
//!
//! The whole list lives in one versioned document and is rewritten on every
//! mutation. A missing or unreadable file loads as an empty list; save
//! errors propagate.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pitwall_circuits::{Category, Circuit};
use pitwall_core::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::FavoriteCircuit;

const FAVORITES_FILE: &str = "favorites.json";

/// File format version for future migrations
const FAVORITES_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{slug} ({category}) is already a favorite")]
    Duplicate { slug: String, category: Category },

    #[error("{slug} ({category}) is not a favorite")]
    NotFound { slug: String, category: Category },
}

impl StoreError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::Storage(e) => e.user_message(),
            StoreError::Duplicate { .. } => "That circuit is already in your favorites.",
            StoreError::NotFound { .. } => "That circuit is not in your favorites.",
        }
    }
}

/// On-disk document shape
#[derive(Debug, Serialize, Deserialize)]
struct FavoritesFile {
    version: u32,
    favorites: Vec<FavoriteCircuit>,
}

/// The user's starred circuits, backed by a single JSON file.
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    favorites: Vec<FavoriteCircuit>,
}

impl FavoritesStore {
    /// Open the store at the platform-default location.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| StorageError::NoDataDir("config directory unavailable".into()))?
            .join("pitwall");
        Ok(Self::open(dir.join(FAVORITES_FILE)))
    }

    /// Open a store backed by a specific file.
    ///
    /// A missing file yields an empty list. A corrupt or unreadable file
    /// also yields an empty list, with a warning, so a damaged document
    /// never takes the feature down.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let favorites = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => match serde_json::from_str::<FavoritesFile>(&contents) {
                Ok(file) => file.favorites,
                Err(e) => {
                    tracing::warn!("Favorites file {:?} is corrupt, starting empty: {}", path, e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites file {:?}, starting empty: {}", path, e);
                Vec::new()
            }
        };

        Self { path, favorites }
    }

    /// Rewrite the whole document.
    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::WriteFailed(format!("create {:?}: {}", parent, e))
                })?;
            }
        }

        let file = FavoritesFile {
            version: FAVORITES_VERSION,
            favorites: self.favorites.clone(),
        };
        let contents = serde_json::to_string_pretty(&file)
            .map_err(|e| StorageError::WriteFailed(format!("serialize favorites: {}", e)))?;

        fs::write(&self.path, contents)
            .map_err(|e| StorageError::WriteFailed(format!("write {:?}: {}", self.path, e)))?;

        tracing::debug!("Saved {} favorites to {:?}", self.favorites.len(), self.path);
        Ok(())
    }

    fn position(&self, category: Category, slug: &str) -> Option<usize> {
        self.favorites
            .iter()
            .position(|f| f.category == category && f.slug == slug)
    }

    /// Whether a circuit is starred.
    pub fn contains(&self, category: Category, slug: &str) -> bool {
        self.position(category, slug).is_some()
    }

    /// All favorites, most recently added first.
    pub fn list(&self) -> Vec<&FavoriteCircuit> {
        let mut favorites: Vec<_> = self.favorites.iter().collect();
        favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Star a circuit. Rejects duplicates by (slug, category).
    pub fn add(&mut self, favorite: FavoriteCircuit) -> Result<(), StoreError> {
        if self.contains(favorite.category, &favorite.slug) {
            return Err(StoreError::Duplicate {
                slug: favorite.slug,
                category: favorite.category,
            });
        }

        self.favorites.push(favorite);
        self.persist()
    }

    /// Unstar a circuit, returning the removed entry.
    pub fn remove(&mut self, category: Category, slug: &str) -> Result<FavoriteCircuit, StoreError> {
        let index = self.position(category, slug).ok_or_else(|| StoreError::NotFound {
            slug: slug.to_string(),
            category,
        })?;

        let removed = self.favorites.remove(index);
        self.persist()?;
        Ok(removed)
    }

    /// Star an unstarred circuit or unstar a starred one.
    /// Returns true when the circuit ended up starred.
    pub fn toggle(&mut self, circuit: &Circuit) -> Result<bool, StoreError> {
        if self.contains(circuit.category, &circuit.slug) {
            self.remove(circuit.category, &circuit.slug)?;
            Ok(false)
        } else {
            self.add(FavoriteCircuit::from_circuit(circuit))?;
            Ok(true)
        }
    }

    /// Remove every favorite.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.favorites.clear();
        self.persist()
    }
}
