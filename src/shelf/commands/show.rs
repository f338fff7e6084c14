//! Presentation data for listings and `info`.
//!
//! Commands never print. They turn records into plain strings here (resolving
//! ids to names through the catalog) and the CLI lays them out with `ruled`.

use super::get::{self, Lookup};
use super::helpers::{format_date, format_number, format_price};
use crate::error::Result;
use crate::model::*;
use crate::store::{Catalog, DataStore, Record};
use chrono::{DateTime, Utc};

/// A listing ready for the table printer.
#[derive(Debug, Clone)]
pub struct Listing {
    pub kind: &'static str,
    pub headers: Vec<&'static str>,
    /// Right edges of the columns as fractions of the line width.
    pub columns: Vec<f32>,
    pub rows: Vec<Vec<String>>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One record as field/value pairs.
#[derive(Debug, Clone)]
pub struct Details {
    pub kind: &'static str,
    pub id: u64,
    pub label: String,
    pub fields: Vec<(&'static str, String)>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Details {
    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }
}

pub trait Describe: Lookup {
    /// Header and right edge of each listing column.
    const COLUMNS: &'static [(&'static str, f32)];

    fn cells(&self, catalog: &Catalog) -> Vec<String>;

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)>;
}

pub fn listing<R: Describe>(catalog: &Catalog, rows: &[R]) -> Listing {
    Listing {
        kind: R::KIND,
        headers: R::COLUMNS.iter().map(|(header, _)| *header).collect(),
        columns: R::COLUMNS.iter().map(|(_, edge)| *edge).collect(),
        rows: rows.iter().map(|row| row.cells(catalog)).collect(),
    }
}

pub fn details<R: Describe>(catalog: &Catalog, record: &R) -> Details {
    Details {
        kind: R::KIND,
        id: record.id().into(),
        label: record.label(catalog),
        fields: record.details(catalog),
        created_at: record.meta().created_at,
        updated_at: record.meta().updated_at,
    }
}

/// `info`: one record by term.
pub fn run<S: DataStore, R: Describe>(store: &S, term: &str) -> Result<Details> {
    store.read(|catalog| {
        let record = get::by_term::<R>(catalog, term)?;
        Ok(details(catalog, &record))
    })
}

fn joined(values: Vec<String>) -> String {
    values.join(", ")
}

fn name_of<R: Record + Lookup>(catalog: &Catalog, id: Option<R::Id>) -> String {
    id.and_then(|id| R::table(catalog).get(id))
        .map(|row| row.label(catalog))
        .unwrap_or_default()
}

fn names_of<R: Record + Lookup>(catalog: &Catalog, ids: &[R::Id]) -> String {
    joined(
        ids.iter()
            .filter_map(|id| R::table(catalog).get(*id))
            .map(|row| row.label(catalog))
            .collect(),
    )
}

fn subject_label(catalog: &Catalog, subject: Subject) -> String {
    catalog
        .describe(subject)
        .map(|label| format!("{} ({})", label, subject))
        .unwrap_or_else(|_| subject.to_string())
}

macro_rules! describe_named {
    ($($ty:ty),*) => {
        $(impl Describe for $ty {
            const COLUMNS: &'static [(&'static str, f32)] =
                &[("#", 0.08), ("Name", 0.6), ("Slug", 1.0)];

            fn cells(&self, _catalog: &Catalog) -> Vec<String> {
                vec![self.meta.id.to_string(), self.name.clone(), self.slug.clone()]
            }

            fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
                vec![
                    ("name", self.name.clone()),
                    ("slug", self.slug.clone()),
                    ("links", joined(catalog.urls(&self.links))),
                ]
            }
        })*
    };
}

describe_named!(Publisher, Series, Journal);

impl Describe for Genre {
    const COLUMNS: &'static [(&'static str, f32)] = &[("#", 0.08), ("Name", 0.6), ("Slug", 1.0)];

    fn cells(&self, _catalog: &Catalog) -> Vec<String> {
        vec![self.meta.id.to_string(), self.name.clone(), self.slug.clone()]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        let books = catalog
            .books
            .iter()
            .filter(|b| b.genres.contains(&self.meta.id))
            .count();
        vec![
            ("name", self.name.clone()),
            ("slug", self.slug.clone()),
            ("books", books.to_string()),
        ]
    }
}

impl Describe for Language {
    const COLUMNS: &'static [(&'static str, f32)] =
        &[("#", 0.08), ("Name", 0.5), ("Code", 0.65), ("Slug", 1.0)];

    fn cells(&self, _catalog: &Catalog) -> Vec<String> {
        vec![
            self.meta.id.to_string(),
            self.name.clone(),
            self.code.clone().unwrap_or_default(),
            self.slug.clone(),
        ]
    }

    fn details(&self, _catalog: &Catalog) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("code", self.code.clone().unwrap_or_default()),
            ("slug", self.slug.clone()),
        ]
    }
}

impl Describe for Magazine {
    const COLUMNS: &'static [(&'static str, f32)] =
        &[("#", 0.08), ("Name", 0.45), ("Issues", 0.55), ("Feed", 1.0)];

    fn cells(&self, catalog: &Catalog) -> Vec<String> {
        let issues = catalog
            .issues
            .iter()
            .filter(|i| i.magazine == self.meta.id)
            .count();
        vec![
            self.meta.id.to_string(),
            self.name.clone(),
            issues.to_string(),
            name_of::<Link>(catalog, self.feed),
        ]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("slug", self.slug.clone()),
            ("feed", name_of::<Link>(catalog, self.feed)),
            ("links", joined(catalog.urls(&self.links))),
        ]
    }
}

impl Describe for Person {
    const COLUMNS: &'static [(&'static str, f32)] =
        &[("#", 0.08), ("Last name", 0.4), ("First name", 0.7), ("Slug", 1.0)];

    fn cells(&self, _catalog: &Catalog) -> Vec<String> {
        vec![
            self.meta.id.to_string(),
            self.last_name.clone().unwrap_or_default(),
            self.first_name.clone(),
            self.slug.clone(),
        ]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        let books = catalog
            .books
            .iter()
            .filter(|b| b.authors.contains(&self.meta.id))
            .map(|b| b.title.clone())
            .collect();
        let papers = catalog
            .papers
            .iter()
            .filter(|p| p.authors.contains(&self.meta.id))
            .map(|p| p.title.clone())
            .collect();
        vec![
            ("first-name", self.first_name.clone()),
            ("last-name", self.last_name.clone().unwrap_or_default()),
            ("slug", self.slug.clone()),
            ("books", joined(books)),
            ("papers", joined(papers)),
            ("links", joined(catalog.urls(&self.links))),
        ]
    }
}

impl Describe for Link {
    const COLUMNS: &'static [(&'static str, f32)] = &[("#", 0.08), ("Url", 1.0)];

    fn cells(&self, _catalog: &Catalog) -> Vec<String> {
        vec![self.meta.id.to_string(), self.url.clone()]
    }

    fn details(&self, _catalog: &Catalog) -> Vec<(&'static str, String)> {
        vec![("url", self.url.clone())]
    }
}

impl Describe for Book {
    const COLUMNS: &'static [(&'static str, f32)] = &[
        ("#", 0.06),
        ("Title", 0.42),
        ("Authors", 0.72),
        ("Series", 0.92),
        ("Vol.", 1.0),
    ];

    fn cells(&self, catalog: &Catalog) -> Vec<String> {
        vec![
            self.meta.id.to_string(),
            self.title.clone(),
            joined(catalog.person_names(&self.authors)),
            name_of::<Series>(catalog, self.series),
            format_number(self.volume),
        ]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        let editions = catalog
            .editions
            .iter()
            .filter(|e| e.book == self.meta.id)
            .map(|e| catalog.edition_label(e))
            .collect();
        vec![
            ("title", self.title.clone()),
            ("slug", self.slug.clone()),
            ("authors", joined(catalog.person_names(&self.authors))),
            ("series", name_of::<Series>(catalog, self.series)),
            ("volume", format_number(self.volume)),
            ("genres", names_of::<Genre>(catalog, &self.genres)),
            ("editions", joined(editions)),
            ("links", joined(catalog.urls(&self.links))),
        ]
    }
}

impl Describe for Edition {
    const COLUMNS: &'static [(&'static str, f32)] = &[
        ("#", 0.06),
        ("Book", 0.4),
        ("ISBN", 0.58),
        ("Published", 0.7),
        ("Publisher", 0.88),
        ("Binding", 1.0),
    ];

    fn cells(&self, catalog: &Catalog) -> Vec<String> {
        vec![
            self.meta.id.to_string(),
            self.alternate_title
                .clone()
                .unwrap_or_else(|| name_of::<Book>(catalog, Some(self.book))),
            self.isbn.clone().unwrap_or_default(),
            format_date(self.publishing_date),
            name_of::<Publisher>(catalog, self.publisher),
            self.binding.clone().unwrap_or_default(),
        ]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        vec![
            ("book", name_of::<Book>(catalog, Some(self.book))),
            (
                "alternate-title",
                self.alternate_title.clone().unwrap_or_default(),
            ),
            ("isbn", self.isbn.clone().unwrap_or_default()),
            ("publishing-date", format_date(self.publishing_date)),
            ("publisher", name_of::<Publisher>(catalog, self.publisher)),
            ("binding", self.binding.clone().unwrap_or_default()),
            ("languages", joined(catalog.language_names(&self.languages))),
            ("links", joined(catalog.urls(&self.links))),
        ]
    }
}

impl Describe for Issue {
    const COLUMNS: &'static [(&'static str, f32)] = &[
        ("#", 0.06),
        ("Magazine", 0.45),
        ("Issue", 0.7),
        ("Published", 1.0),
    ];

    fn cells(&self, catalog: &Catalog) -> Vec<String> {
        vec![
            self.meta.id.to_string(),
            name_of::<Magazine>(catalog, Some(self.magazine)),
            self.issue.clone(),
            format_date(self.publishing_date),
        ]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        vec![
            ("magazine", name_of::<Magazine>(catalog, Some(self.magazine))),
            ("issue", self.issue.clone()),
            ("publishing-date", format_date(self.publishing_date)),
            ("cover", self.cover.clone().unwrap_or_default()),
            ("languages", joined(catalog.language_names(&self.languages))),
            ("links", joined(catalog.urls(&self.links))),
        ]
    }
}

impl Describe for Paper {
    const COLUMNS: &'static [(&'static str, f32)] = &[
        ("#", 0.06),
        ("Title", 0.45),
        ("Authors", 0.7),
        ("Journal", 0.9),
        ("Year", 1.0),
    ];

    fn cells(&self, catalog: &Catalog) -> Vec<String> {
        vec![
            self.meta.id.to_string(),
            self.title.clone(),
            joined(catalog.person_names(&self.authors)),
            name_of::<Journal>(catalog, self.journal),
            self.publishing_date
                .map(|d| d.format("%Y").to_string())
                .unwrap_or_default(),
        ]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("slug", self.slug.clone()),
            ("authors", joined(catalog.person_names(&self.authors))),
            ("journal", name_of::<Journal>(catalog, self.journal)),
            ("volume", self.volume.clone().unwrap_or_default()),
            ("publishing-date", format_date(self.publishing_date)),
            ("languages", joined(catalog.language_names(&self.languages))),
            ("links", joined(catalog.urls(&self.links))),
        ]
    }
}

impl Describe for File {
    const COLUMNS: &'static [(&'static str, f32)] =
        &[("#", 0.06), ("Name", 0.45), ("Subject", 1.0)];

    fn cells(&self, catalog: &Catalog) -> Vec<String> {
        vec![
            self.meta.id.to_string(),
            self.name.clone(),
            subject_label(catalog, self.subject),
        ]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("subject", subject_label(catalog, self.subject)),
            ("blob", self.blob.clone()),
        ]
    }
}

impl Describe for Acquisition {
    const COLUMNS: &'static [(&'static str, f32)] =
        &[("#", 0.06), ("Date", 0.2), ("Price", 0.32), ("Subject", 1.0)];

    fn cells(&self, catalog: &Catalog) -> Vec<String> {
        vec![
            self.meta.id.to_string(),
            format_date(self.date),
            format_price(self.price),
            subject_label(catalog, self.subject),
        ]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        vec![
            ("subject", subject_label(catalog, self.subject)),
            ("date", format_date(self.date)),
            ("price", format_price(self.price)),
        ]
    }
}

impl Describe for Read {
    const COLUMNS: &'static [(&'static str, f32)] =
        &[("#", 0.06), ("Started", 0.2), ("Finished", 0.34), ("Subject", 1.0)];

    fn cells(&self, catalog: &Catalog) -> Vec<String> {
        vec![
            self.meta.id.to_string(),
            format_date(self.started),
            format_date(self.finished),
            subject_label(catalog, self.subject),
        ]
    }

    fn details(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        vec![
            ("subject", subject_label(catalog, self.subject)),
            ("started", format_date(self.started)),
            ("finished", format_date(self.finished)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create::{self, NewBook};
    use crate::commands::edit;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn columns_are_strictly_increasing() {
        fn check<R: Describe>() {
            let edges: Vec<f32> = R::COLUMNS.iter().map(|(_, e)| *e).collect();
            assert!(edges.windows(2).all(|w| w[0] < w[1]), "{}", R::KIND);
            assert_eq!(edges.last().copied(), Some(1.0), "{}", R::KIND);
        }
        check::<Genre>();
        check::<Language>();
        check::<Publisher>();
        check::<Magazine>();
        check::<Person>();
        check::<Link>();
        check::<Book>();
        check::<Edition>();
        check::<Issue>();
        check::<Paper>();
        check::<File>();
        check::<Acquisition>();
        check::<Read>();
    }

    #[test]
    fn book_info_resolves_names() {
        let mut store = InMemoryStore::new();
        create::book(
            &mut store,
            NewBook {
                title: "Good Omens".into(),
                authors: vec!["Terry Pratchett".into(), "Neil Gaiman".into()],
                genres: vec!["Fantasy".into()],
                volume: Some("1".into()),
                ..NewBook::default()
            },
        )
        .unwrap();

        let details = run::<_, Book>(&store, "omens").unwrap();
        assert_eq!(details.label, "Good Omens");
        assert_eq!(
            details.value("authors"),
            Some("Terry Pratchett, Neil Gaiman")
        );
        assert_eq!(details.value("genres"), Some("Fantasy"));
        assert_eq!(details.value("volume"), Some("1"));
    }

    #[test]
    fn listing_rows_follow_columns() {
        let mut store = InMemoryStore::new();
        create::book(&mut store, NewBook::titled("Dune")).unwrap();
        edit::run::<_, Book>(&mut store, "1", "series", "Dune Chronicles").unwrap();

        let listing = store
            .read(|c| Ok(listing(c, &c.list::<Book>())))
            .unwrap();
        assert_eq!(listing.headers.len(), listing.columns.len());
        assert_eq!(listing.rows[0].len(), listing.headers.len());
        assert_eq!(listing.rows[0][1], "Dune");
        assert_eq!(listing.rows[0][3], "Dune Chronicles");
    }
}
