//! Persistence of the scoring book
//!
//! This module defines the trait the scorekeeper uses to commit its book
//! after every mutation. The trait abstracts the storage mechanism so that
//! callers can plug in a database, a file or a sync service, while the model
//! only promises to call `save` once per mutating operation.

use crate::book::Book;

/// Trait for durably storing a book
pub trait Store {
    /// Error reported when saving fails
    type Error: std::error::Error;

    /// Commits the full book
    ///
    /// Called after every mutating operation. The in-memory book already
    /// reflects the mutation when this is called and is not rolled back if
    /// saving fails.
    fn save(&mut self, book: &Book) -> Result<(), Self::Error>;
}

/// A store that keeps the last saved book as JSON in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    snapshot: Option<String>,
    saves: usize,
}

impl MemoryStore {
    /// The last saved snapshot, if any
    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Restores the last saved book, or an empty one if nothing was saved
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the snapshot cannot be parsed.
    pub fn load(&self) -> Result<Book, serde_json::Error> {
        self.snapshot
            .as_deref()
            .map_or_else(|| Ok(Book::default()), serde_json::from_str)
    }
}

impl Store for MemoryStore {
    type Error = serde_json::Error;

    fn save(&mut self, book: &Book) -> Result<(), Self::Error> {
        self.snapshot = Some(serde_json::to_string(book)?);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryStore::default();
        assert!(store.snapshot().is_none());
        assert_eq!(store.saves(), 0);
        assert_eq!(store.load().unwrap().teams().count(), 0);
    }

    #[test]
    fn test_memory_store_save_and_load() {
        let mut store = MemoryStore::default();
        store.save(&Book::default()).unwrap();
        store.save(&Book::default()).unwrap();

        assert_eq!(store.saves(), 2);
        assert!(store.snapshot().is_some());
        assert_eq!(store.load().unwrap().quizzes().count(), 0);
    }
}
