//! Get-or-create for every catalog entity.
//!
//! Each command runs in a single store transaction: the natural key is looked
//! up first and an existing row is returned untouched; only a new row gets its
//! related records (authors, genres, links...) resolved and created.

use super::{attach, get};
use super::helpers::{
    add_language, add_link, named_for, optional_text, parse_date, parse_number, person_for,
    push_unique, required_text,
};
use crate::error::Result;
use crate::model::*;
use crate::store::{Catalog, Created, DataStore, Record};
use std::path::PathBuf;
use tracing::debug;

/// Row sharing `candidate`'s natural key, if any.
fn existing<R: Record>(catalog: &Catalog, candidate: &R) -> Option<R> {
    let key = candidate.natural_key()?;
    R::table(catalog).find_natural(&key).cloned()
}

fn insert_new<R: Record>(catalog: &mut Catalog, record: R) -> Result<Created<R>> {
    let saved = catalog.insert(record)?;
    debug!(kind = R::KIND, id = %saved.id(), "record created");
    Ok(Created::New(saved))
}

fn links_for(catalog: &mut Catalog, urls: &[String]) -> Result<Vec<LinkId>> {
    let mut ids = Vec::new();
    for url in urls {
        let url = required_text("link", url)?;
        push_unique(&mut ids, catalog.link_for(&url)?);
    }
    Ok(ids)
}

fn authors_for(catalog: &mut Catalog, names: &[String]) -> Result<Vec<PersonId>> {
    let mut ids = Vec::new();
    for name in names {
        push_unique(&mut ids, person_for(catalog, name)?);
    }
    Ok(ids)
}

fn optional_named<R: Record + Named>(
    catalog: &mut Catalog,
    name: Option<&String>,
) -> Result<Option<R::Id>> {
    match name.and_then(|n| optional_text(n)) {
        Some(name) => named_for::<R>(catalog, &name).map(Some),
        None => Ok(None),
    }
}

/// Genre, publisher, series or journal by name.
pub fn named<S: DataStore, R: Record + Named>(store: &mut S, name: &str) -> Result<Created<R>> {
    let name = required_text(R::KIND, name)?;
    store.write(|catalog| match existing(catalog, &R::with_name(name.clone())) {
        Some(found) => Ok(Created::Existing(found)),
        None => insert_new(catalog, R::with_name(name)),
    })
}

pub fn language<S: DataStore>(store: &mut S, name: &str, code: Option<&str>) -> Result<Created<Language>> {
    let name = required_text("language", name)?;
    let mut candidate = Language::with_name(name);
    candidate.code = code.and_then(optional_text);
    store.write(|catalog| match existing(catalog, &candidate) {
        Some(found) => Ok(Created::Existing(found)),
        None => insert_new(catalog, candidate),
    })
}

pub fn magazine<S: DataStore>(store: &mut S, name: &str, feed: Option<&str>) -> Result<Created<Magazine>> {
    let name = required_text("magazine", name)?;
    let feed = feed.and_then(optional_text);
    store.write(|catalog| {
        let mut candidate = Magazine::with_name(name);
        if let Some(found) = existing(catalog, &candidate) {
            return Ok(Created::Existing(found));
        }
        if let Some(url) = feed {
            candidate.feed = Some(catalog.link_for(&url)?);
        }
        insert_new(catalog, candidate)
    })
}

pub fn link<S: DataStore>(store: &mut S, url: &str) -> Result<Created<Link>> {
    let url = required_text("url", url)?;
    let candidate = Link {
        meta: Meta::new(),
        url,
    };
    store.write(|catalog| match existing(catalog, &candidate) {
        Some(found) => Ok(Created::Existing(found)),
        None => insert_new(catalog, candidate),
    })
}

#[derive(Debug, Clone, Default)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: Option<String>,
    pub links: Vec<String>,
}

pub fn person<S: DataStore>(store: &mut S, input: NewPerson) -> Result<Created<Person>> {
    let candidate = Person {
        meta: Meta::new(),
        slug: String::new(),
        first_name: required_text("first-name", &input.first_name)?,
        last_name: input.last_name.as_deref().and_then(optional_text),
        links: Vec::new(),
    };
    store.write(|catalog| {
        if let Some(found) = existing(catalog, &candidate) {
            return Ok(Created::Existing(found));
        }
        let mut candidate = candidate;
        candidate.links = links_for(catalog, &input.links)?;
        insert_new(catalog, candidate)
    })
}

#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub title: String,
    pub authors: Vec<String>,
    pub series: Option<String>,
    pub volume: Option<String>,
    pub genres: Vec<String>,
    pub links: Vec<String>,
}

impl NewBook {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

pub fn book<S: DataStore>(store: &mut S, input: NewBook) -> Result<Created<Book>> {
    let candidate = Book {
        meta: Meta::new(),
        slug: String::new(),
        title: required_text("title", &input.title)?,
        authors: Vec::new(),
        series: None,
        volume: match &input.volume {
            Some(v) => parse_number("volume", v)?,
            None => None,
        },
        genres: Vec::new(),
        links: Vec::new(),
    };
    store.write(|catalog| {
        if let Some(found) = existing(catalog, &candidate) {
            return Ok(Created::Existing(found));
        }
        let mut book = candidate;
        book.authors = authors_for(catalog, &input.authors)?;
        book.series = optional_named::<Series>(catalog, input.series.as_ref())?;
        for genre in &input.genres {
            push_unique(&mut book.genres, named_for::<Genre>(catalog, genre)?);
        }
        book.links = links_for(catalog, &input.links)?;
        insert_new(catalog, book)
    })
}

#[derive(Debug, Clone, Default)]
pub struct NewEdition {
    /// Term resolving the book: an id, title or slug.
    pub book: String,
    pub alternate_title: Option<String>,
    pub isbn: Option<String>,
    pub publishing_date: Option<String>,
    pub publisher: Option<String>,
    pub binding: Option<String>,
    pub languages: Vec<String>,
    pub links: Vec<String>,
}

pub fn edition<S: DataStore>(store: &mut S, input: NewEdition) -> Result<Created<Edition>> {
    let publishing_date = match &input.publishing_date {
        Some(date) => parse_date("publishing-date", date)?,
        None => None,
    };
    store.write(|catalog| {
        let book = get::by_term::<Book>(catalog, &input.book)?;
        let mut edition = Edition {
            meta: Meta::new(),
            book: book.id(),
            alternate_title: input.alternate_title.as_deref().and_then(optional_text),
            isbn: input.isbn.as_deref().and_then(optional_text),
            publishing_date,
            publisher: None,
            binding: input.binding.as_deref().and_then(optional_text),
            languages: Vec::new(),
            links: Vec::new(),
        };
        if let Some(found) = existing(catalog, &edition) {
            return Ok(Created::Existing(found));
        }
        edition.publisher = optional_named::<Publisher>(catalog, input.publisher.as_ref())?;
        for language in &input.languages {
            add_language(catalog, &mut edition, language)?;
        }
        for url in &input.links {
            add_link(catalog, &mut edition, url)?;
        }
        insert_new(catalog, edition)
    })
}

#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    /// Term resolving the magazine: an id, name or slug.
    pub magazine: String,
    pub issue: String,
    pub publishing_date: Option<String>,
    /// Image file copied into the blob store as the issue's cover.
    pub cover: Option<PathBuf>,
    pub languages: Vec<String>,
    pub links: Vec<String>,
}

/// An existing issue keeps its cover; the image is only stored for a new one.
pub fn issue<S: DataStore>(store: &mut S, input: NewIssue) -> Result<Created<Issue>> {
    let label = required_text("issue", &input.issue)?;
    let publishing_date = match &input.publishing_date {
        Some(date) => parse_date("publishing-date", date)?,
        None => None,
    };
    let cover = match &input.cover {
        Some(path) => Some(attach::store_cover(store, path)?),
        None => None,
    };
    let created = store.write(|catalog| {
        let magazine = get::by_term::<Magazine>(catalog, &input.magazine)?;
        let mut issue = Issue {
            meta: Meta::new(),
            magazine: magazine.id(),
            issue: label,
            publishing_date,
            cover: cover.clone(),
            languages: Vec::new(),
            links: Vec::new(),
        };
        if let Some(found) = existing(catalog, &issue) {
            return Ok(Created::Existing(found));
        }
        for language in &input.languages {
            add_language(catalog, &mut issue, language)?;
        }
        for url in &input.links {
            add_link(catalog, &mut issue, url)?;
        }
        insert_new(catalog, issue)
    });
    if !matches!(created, Ok(Created::New(_))) {
        if let Some(blob) = &cover {
            attach::discard_blob(store, blob);
        }
    }
    created
}

#[derive(Debug, Clone, Default)]
pub struct NewPaper {
    pub title: String,
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub publishing_date: Option<String>,
    pub languages: Vec<String>,
    pub links: Vec<String>,
}

pub fn paper<S: DataStore>(store: &mut S, input: NewPaper) -> Result<Created<Paper>> {
    let candidate = Paper {
        meta: Meta::new(),
        slug: String::new(),
        title: required_text("title", &input.title)?,
        authors: Vec::new(),
        journal: None,
        volume: input.volume.as_deref().and_then(optional_text),
        publishing_date: match &input.publishing_date {
            Some(date) => parse_date("publishing-date", date)?,
            None => None,
        },
        languages: Vec::new(),
        links: Vec::new(),
    };
    store.write(|catalog| {
        if let Some(found) = existing(catalog, &candidate) {
            return Ok(Created::Existing(found));
        }
        let mut paper = candidate;
        paper.authors = authors_for(catalog, &input.authors)?;
        paper.journal = optional_named::<Journal>(catalog, input.journal.as_ref())?;
        for language in &input.languages {
            add_language(catalog, &mut paper, language)?;
        }
        paper.links = links_for(catalog, &input.links)?;
        insert_new(catalog, paper)
    })
}
