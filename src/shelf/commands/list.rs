use super::get;
use super::show::{self, Describe, Listing};
use crate::error::Result;
use crate::store::{Catalog, DataStore};

fn rows<R: Describe>(catalog: &Catalog, search: Option<&str>) -> Vec<R> {
    match search {
        Some(term) => get::search::<R>(catalog, term),
        None => catalog.list::<R>(),
    }
}

/// Rows in their listing order, or ranked by `search` when given.
pub fn records<S: DataStore, R: Describe>(store: &S, search: Option<&str>) -> Result<Vec<R>> {
    store.read(|catalog| Ok(rows(catalog, search)))
}

pub fn run<S: DataStore, R: Describe>(store: &S, search: Option<&str>) -> Result<Listing> {
    store.read(|catalog| Ok(show::listing(catalog, &rows::<R>(catalog, search))))
}
