//! Spot catalog - the set of tourist attractions and every read/write over it.
//!
//! Listings are always ranked by recommendation count (highest first), with
//! ties broken by ascending id so the order is reproducible.

mod sqlite;
mod types;

pub use sqlite::SqliteSpotCatalog;
pub use types::*;

/// Trait for spot catalog storage.
pub trait SpotCatalog: Send + Sync {
    /// Ensure the table exists and optionally seed it when empty.
    ///
    /// Returns the number of seed records inserted (0 if the table already
    /// had data or seeding was not requested).
    fn initialize(&self, seed_if_empty: bool) -> Result<usize, SpotError>;

    /// All spots in ranking order.
    fn list(&self) -> Result<Vec<Spot>, SpotError>;

    /// Spots whose name or description contains `query` (case-sensitive).
    ///
    /// An empty query is the same as [`SpotCatalog::list`].
    fn search(&self, query: &str) -> Result<Vec<Spot>, SpotError>;

    /// Get a spot by id.
    fn get(&self, id: i64) -> Result<Option<Spot>, SpotError>;

    /// Number of stored spots.
    fn count(&self) -> Result<i64, SpotError>;

    /// Insert a new spot with a zero recommendation count.
    fn create(&self, fields: SpotFields) -> Result<Spot, SpotError>;

    /// Increment the recommendation count by one.
    ///
    /// Unknown ids are reported as [`WriteOutcome::Missing`], not as errors.
    fn recommend(&self, id: i64) -> Result<WriteOutcome, SpotError>;

    /// Apply a partial update, returning the updated spot.
    ///
    /// Fails with [`SpotError::NotFound`] if the spot does not exist.
    fn update(&self, id: i64, patch: SpotPatch) -> Result<Spot, SpotError>;

    /// Permanently delete a spot. Deleting an unknown id is a no-op.
    fn delete(&self, id: i64) -> Result<WriteOutcome, SpotError>;

    /// Delete every spot whose id is in `ids`, returning how many were removed.
    ///
    /// Unknown ids are ignored.
    fn batch_delete(&self, ids: &[i64]) -> Result<usize, SpotError>;
}
