use super::catalog::Catalog;
use super::DataStore;
use crate::error::{Result, ShelfError};
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    catalog: Catalog,
    blobs: HashMap<String, Vec<u8>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }
}

impl DataStore for InMemoryStore {
    fn read<T>(&self, f: impl FnOnce(&Catalog) -> Result<T>) -> Result<T> {
        f(&self.catalog)
    }

    fn write<T>(&mut self, f: impl FnOnce(&mut Catalog) -> Result<T>) -> Result<T> {
        // Work on a copy so a failing closure leaves nothing behind.
        let mut draft = self.catalog.clone();
        let out = f(&mut draft)?;
        self.catalog = draft;
        Ok(out)
    }

    fn put_blob(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get_blob(&self, name: &str) -> Result<Vec<u8>> {
        self.blobs
            .get(name)
            .cloned()
            .ok_or_else(|| ShelfError::not_found("blob", name))
    }

    fn delete_blob(&mut self, name: &str) -> Result<()> {
        self.blobs
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ShelfError::not_found("blob", name))
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        PathBuf::from("memory").join(name)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_genres(mut self, names: &[&str]) -> Self {
            self.store
                .write(|c| {
                    for name in names {
                        c.insert(Genre::with_name(name.to_string()))?;
                    }
                    Ok(())
                })
                .unwrap();
            self
        }

        pub fn with_book(mut self, title: &str) -> Self {
            let book = Book {
                meta: Meta::new(),
                slug: String::new(),
                title: title.to_string(),
                authors: vec![],
                series: None,
                volume: None,
                genres: vec![],
                links: vec![],
            };
            self.store.write(|c| c.insert(book)).unwrap();
            self
        }

        pub fn with_edition(mut self, book: BookId, isbn: &str) -> Self {
            let edition = Edition {
                meta: Meta::new(),
                book,
                alternate_title: None,
                isbn: Some(isbn.to_string()),
                publishing_date: None,
                publisher: None,
                binding: None,
                languages: vec![],
                links: vec![],
            };
            self.store.write(|c| c.insert(edition)).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Genre, Named};

    #[test]
    fn failed_write_is_rolled_back() {
        let mut store = InMemoryStore::new();
        let res: Result<()> = store.write(|c| {
            c.insert(Genre::with_name("Kept?".into()))?;
            Err(ShelfError::Store("boom".into()))
        });
        assert!(res.is_err());
        let count = store.read(|c| Ok(c.genres.len())).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn blobs_can_be_deleted_once() {
        let mut store = InMemoryStore::new();
        store.put_blob("a.pdf", b"%PDF").unwrap();
        assert_eq!(store.get_blob("a.pdf").unwrap(), b"%PDF");
        store.delete_blob("a.pdf").unwrap();
        assert!(matches!(
            store.get_blob("a.pdf"),
            Err(ShelfError::NotFound { .. })
        ));
        assert!(store.delete_blob("a.pdf").is_err());
    }
}
