//! Favorite circuits for Pitwall
//!
//! Persists the user's starred circuits as a single JSON document,
//! rewritten wholesale on every mutation.

pub mod store;
pub mod types;

pub use store::{FavoritesStore, StoreError};
pub use types::FavoriteCircuit;
