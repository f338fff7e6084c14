//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all shelf operations, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Picks the record type**: most commands are generic over the entity, the
//!   facade is where a caller names it (`api.list::<Book>(None)`)
//! - **Returns structured types** (`Result<CmdResult<T>>`, `Listing`, `Details`...)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Terminal I/O**: No stdout, stderr or formatting
//!
//! ## Generic Over DataStore
//!
//! `ShelfApi<S: DataStore>` is generic over the storage backend:
//! - Production: `ShelfApi<FileStore>`
//! - Testing: `ShelfApi<InMemoryStore>`

use crate::commands;
use crate::commands::attach::Status;
use crate::commands::create::{NewBook, NewEdition, NewIssue, NewPaper, NewPerson};
use crate::commands::delete::Cascade;
use crate::commands::edit::Editable;
use crate::commands::get::Lookup;
use crate::commands::show::{Describe, Details, Listing};
use crate::error::Result;
use crate::model::*;
use crate::store::{Created, DataStore, Record};
use std::path::{Path, PathBuf};

/// The main API facade for shelf operations.
pub struct ShelfApi<S: DataStore> {
    store: S,
    paths: commands::ShelfPaths,
}

impl<S: DataStore> ShelfApi<S> {
    pub fn new(store: S, paths: commands::ShelfPaths) -> Self {
        Self { store, paths }
    }

    pub fn paths(&self) -> &commands::ShelfPaths {
        &self.paths
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Genre, publisher, series or journal.
    pub fn create_named<R: Record + Named>(&mut self, name: &str) -> Result<Created<R>> {
        commands::create::named(&mut self.store, name)
    }

    pub fn create_language(&mut self, name: &str, code: Option<&str>) -> Result<Created<Language>> {
        commands::create::language(&mut self.store, name, code)
    }

    pub fn create_magazine(&mut self, name: &str, feed: Option<&str>) -> Result<Created<Magazine>> {
        commands::create::magazine(&mut self.store, name, feed)
    }

    pub fn create_link(&mut self, url: &str) -> Result<Created<Link>> {
        commands::create::link(&mut self.store, url)
    }

    pub fn create_person(&mut self, input: NewPerson) -> Result<Created<Person>> {
        commands::create::person(&mut self.store, input)
    }

    pub fn create_book(&mut self, input: NewBook) -> Result<Created<Book>> {
        commands::create::book(&mut self.store, input)
    }

    pub fn create_edition(&mut self, input: NewEdition) -> Result<Created<Edition>> {
        commands::create::edition(&mut self.store, input)
    }

    pub fn create_issue(&mut self, input: NewIssue) -> Result<Created<Issue>> {
        commands::create::issue(&mut self.store, input)
    }

    pub fn create_paper(&mut self, input: NewPaper) -> Result<Created<Paper>> {
        commands::create::paper(&mut self.store, input)
    }

    pub fn get<R: Lookup>(&self, term: &str) -> Result<R> {
        commands::get::run(&self.store, term)
    }

    pub fn info<R: Describe>(&self, term: &str) -> Result<Details> {
        commands::show::run::<_, R>(&self.store, term)
    }

    pub fn list<R: Describe>(&self, search: Option<&str>) -> Result<Listing> {
        commands::list::run::<_, R>(&self.store, search)
    }

    pub fn records<R: Describe>(&self, search: Option<&str>) -> Result<Vec<R>> {
        commands::list::records(&self.store, search)
    }

    pub fn edit<R: Editable>(
        &mut self,
        term: &str,
        field: &str,
        value: &str,
    ) -> Result<commands::CmdResult<R>> {
        commands::edit::run(&mut self.store, term, field, value)
    }

    pub fn delete<R: Cascade>(&mut self, term: &str) -> Result<commands::CmdResult<R>> {
        commands::delete::run(&mut self.store, term)
    }

    pub fn add_acquisition(&mut self, subject: &str, date: &str, price: &str) -> Result<Acquisition> {
        commands::attach::add_acquisition(&mut self.store, subject, date, price)
    }

    pub fn add_read(&mut self, subject: &str, started: &str, finished: &str) -> Result<Read> {
        commands::attach::add_read(&mut self.store, subject, started, finished)
    }

    pub fn attach_file(&mut self, subject: &str, path: &Path) -> Result<File> {
        commands::attach::attach_file(&mut self.store, subject, path)
    }

    pub fn attach_bytes(&mut self, subject: &str, name: &str, bytes: &[u8]) -> Result<File> {
        commands::attach::attach_bytes(&mut self.store, subject, name, bytes)
    }

    pub fn open_file(&self, term: &str) -> Result<(File, Vec<u8>)> {
        commands::attach::open(&self.store, term)
    }

    pub fn file_path(&self, term: &str) -> Result<PathBuf> {
        commands::attach::path(&self.store, term)
    }

    pub fn set_cover(
        &mut self,
        term: &str,
        path: Option<&Path>,
    ) -> Result<commands::CmdResult<Issue>> {
        commands::attach::set_cover(&mut self.store, term, path)
    }

    pub fn cover_path(&self, term: &str) -> Result<PathBuf> {
        commands::attach::cover_path(&self.store, term)
    }

    pub fn status(&self, subject: &str) -> Result<Status> {
        commands::attach::status(&self.store, subject)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult<ConfigValues>> {
        commands::config::run(&self.paths, action)
    }
}

pub use crate::commands::config::{ConfigAction, ConfigValues};
pub use commands::{CmdMessage, CmdResult, MessageLevel, ShelfPaths};
