//! # Storage Layer
//!
//! The store holds the whole [`Catalog`] (one typed [`Table`] per record type)
//! plus a blob area for the bytes of attached files.
//!
//! ## Transactions
//!
//! Every operation runs inside [`DataStore::read`] or [`DataStore::write`].
//! A write hands the closure a mutable catalog and commits only when the
//! closure returns `Ok`. Uniqueness checks happen inside the same closure as
//! the insert they guard, so get-or-create never races a separate check.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage
//!   - catalog in `data.json`, replaced atomically on commit
//!   - blobs in the media directory, one file per attachment
//! - [`memory::InMemoryStore`]: for tests, nothing persisted
//!
//! ## Storage Format
//!
//! ```text
//! ~/.local/share/shelf/
//! ├── data.json        # every table, keyed by id
//! ├── config.json      # see config.rs
//! └── files/           # attached binaries, named <uuid>.<ext>
//! ```

use crate::error::Result;
use std::path::PathBuf;

pub mod catalog;
pub mod fs;
pub mod memory;
pub mod record;

pub use catalog::{Catalog, Created, Detached, Table};
pub use record::{Attachable, Record, UniqueKey};

/// Abstract interface for catalog storage.
pub trait DataStore {
    /// Run `f` against a snapshot of the catalog.
    fn read<T>(&self, f: impl FnOnce(&Catalog) -> Result<T>) -> Result<T>;

    /// Run `f` against the catalog, committing its changes only if it succeeds.
    fn write<T>(&mut self, f: impl FnOnce(&mut Catalog) -> Result<T>) -> Result<T>;

    /// Store bytes under `name`, replacing any previous content.
    fn put_blob(&mut self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Fails with `NotFound` when there is no blob called `name`.
    fn get_blob(&self, name: &str) -> Result<Vec<u8>>;

    fn delete_blob(&mut self, name: &str) -> Result<()>;

    /// Location of a blob (virtual for stores without a filesystem).
    fn blob_path(&self, name: &str) -> PathBuf;
}
