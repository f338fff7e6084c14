use super::catalog::{Catalog, Table};
use crate::model::*;
use crate::slug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A (column, value) pair the store keeps unique within a table.
pub type UniqueKey = (&'static str, String);

/// A row type of the [`Catalog`].
///
/// Tables are typed by their record, so generic store operations resolve the
/// right table at compile time through [`Record::table`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Default + Ord + From<u64> + Into<u64> + fmt::Display;

    /// Human readable kind, used in messages and errors.
    const KIND: &'static str;

    fn meta(&self) -> &Meta<Self::Id>;
    fn meta_mut(&mut self) -> &mut Meta<Self::Id>;

    fn id(&self) -> Self::Id {
        self.meta().id
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    /// Key get-or-create matches on. `None` means every create inserts.
    fn natural_key(&self) -> Option<UniqueKey> {
        self.unique_keys().into_iter().next()
    }

    /// Save hook, `previous` is the stored row on update.
    fn before_save(&mut self, _previous: Option<&Self>) {}

    fn order(&self, other: &Self) -> Ordering {
        self.id().cmp(&other.id())
    }

    fn table(catalog: &Catalog) -> &Table<Self>;
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self>;
}

fn lower(s: &str) -> String {
    s.to_lowercase()
}

macro_rules! named_table {
    ($ty:ident, $id:ident, $kind:literal, $table:ident) => {
        impl Record for $ty {
            type Id = $id;
            const KIND: &'static str = $kind;

            fn meta(&self) -> &Meta<$id> {
                &self.meta
            }
            fn meta_mut(&mut self) -> &mut Meta<$id> {
                &mut self.meta
            }
            fn unique_keys(&self) -> Vec<UniqueKey> {
                vec![("name", self.name.clone()), ("slug", self.slug.clone())]
            }
            fn before_save(&mut self, previous: Option<&Self>) {
                slug::assign(self, previous);
            }
            fn order(&self, other: &Self) -> Ordering {
                lower(&self.name).cmp(&lower(&other.name))
            }
            fn table(catalog: &Catalog) -> &Table<Self> {
                &catalog.$table
            }
            fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
                &mut catalog.$table
            }
        }
    };
}

named_table!(Genre, GenreId, "genre", genres);
named_table!(Language, LanguageId, "language", languages);
named_table!(Publisher, PublisherId, "publisher", publishers);
named_table!(Series, SeriesId, "series", series);
named_table!(Journal, JournalId, "journal", journals);
named_table!(Magazine, MagazineId, "magazine", magazines);

impl Record for Person {
    type Id = PersonId;
    const KIND: &'static str = "person";

    fn meta(&self) -> &Meta<PersonId> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut Meta<PersonId> {
        &mut self.meta
    }
    fn unique_keys(&self) -> Vec<UniqueKey> {
        let pair = match &self.last_name {
            Some(last) => format!("{}, {}", last, self.first_name),
            None => self.first_name.clone(),
        };
        vec![("last_name, first_name", pair), ("slug", self.slug.clone())]
    }
    fn before_save(&mut self, previous: Option<&Self>) {
        slug::assign(self, previous);
    }
    fn order(&self, other: &Self) -> Ordering {
        let key = |p: &Person| {
            (
                p.last_name.as_deref().map(lower),
                lower(&p.first_name),
            )
        };
        key(self).cmp(&key(other))
    }
    fn table(catalog: &Catalog) -> &Table<Self> {
        &catalog.persons
    }
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
        &mut catalog.persons
    }
}

impl Record for Link {
    type Id = LinkId;
    const KIND: &'static str = "link";

    fn meta(&self) -> &Meta<LinkId> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut Meta<LinkId> {
        &mut self.meta
    }
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![("url", self.url.clone())]
    }
    fn order(&self, other: &Self) -> Ordering {
        self.url.cmp(&other.url)
    }
    fn table(catalog: &Catalog) -> &Table<Self> {
        &catalog.links
    }
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
        &mut catalog.links
    }
}

impl Record for Book {
    type Id = BookId;
    const KIND: &'static str = "book";

    fn meta(&self) -> &Meta<BookId> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut Meta<BookId> {
        &mut self.meta
    }
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![("title", self.title.clone()), ("slug", self.slug.clone())]
    }
    fn before_save(&mut self, previous: Option<&Self>) {
        slug::assign(self, previous);
    }
    fn order(&self, other: &Self) -> Ordering {
        lower(&self.title).cmp(&lower(&other.title))
    }
    fn table(catalog: &Catalog) -> &Table<Self> {
        &catalog.books
    }
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
        &mut catalog.books
    }
}

impl Record for Edition {
    type Id = EditionId;
    const KIND: &'static str = "edition";

    fn meta(&self) -> &Meta<EditionId> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut Meta<EditionId> {
        &mut self.meta
    }
    // Editions are not unique, but adding the same ISBN to a book twice
    // returns the existing edition.
    fn natural_key(&self) -> Option<UniqueKey> {
        self.isbn
            .as_ref()
            .map(|isbn| ("book, isbn", format!("{}/{}", self.book, isbn)))
    }
    fn order(&self, other: &Self) -> Ordering {
        (self.book, self.publishing_date, self.id()).cmp(&(
            other.book,
            other.publishing_date,
            other.id(),
        ))
    }
    fn table(catalog: &Catalog) -> &Table<Self> {
        &catalog.editions
    }
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
        &mut catalog.editions
    }
}

impl Record for Issue {
    type Id = IssueId;
    const KIND: &'static str = "issue";

    fn meta(&self) -> &Meta<IssueId> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut Meta<IssueId> {
        &mut self.meta
    }
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![(
            "magazine, issue",
            format!("{}/{}", self.magazine, self.issue),
        )]
    }
    fn order(&self, other: &Self) -> Ordering {
        (self.magazine, self.publishing_date, &self.issue).cmp(&(
            other.magazine,
            other.publishing_date,
            &other.issue,
        ))
    }
    fn table(catalog: &Catalog) -> &Table<Self> {
        &catalog.issues
    }
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
        &mut catalog.issues
    }
}

impl Record for Paper {
    type Id = PaperId;
    const KIND: &'static str = "paper";

    fn meta(&self) -> &Meta<PaperId> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut Meta<PaperId> {
        &mut self.meta
    }
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![("title", self.title.clone()), ("slug", self.slug.clone())]
    }
    fn before_save(&mut self, previous: Option<&Self>) {
        slug::assign(self, previous);
    }
    fn order(&self, other: &Self) -> Ordering {
        lower(&self.title).cmp(&lower(&other.title))
    }
    fn table(catalog: &Catalog) -> &Table<Self> {
        &catalog.papers
    }
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
        &mut catalog.papers
    }
}

impl Record for File {
    type Id = FileId;
    const KIND: &'static str = "file";

    fn meta(&self) -> &Meta<FileId> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut Meta<FileId> {
        &mut self.meta
    }
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![("blob", self.blob.clone())]
    }
    fn natural_key(&self) -> Option<UniqueKey> {
        None
    }
    fn order(&self, other: &Self) -> Ordering {
        (self.subject, &self.name).cmp(&(other.subject, &other.name))
    }
    fn table(catalog: &Catalog) -> &Table<Self> {
        &catalog.files
    }
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
        &mut catalog.files
    }
}

impl Record for Acquisition {
    type Id = AcquisitionId;
    const KIND: &'static str = "acquisition";

    fn meta(&self) -> &Meta<AcquisitionId> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut Meta<AcquisitionId> {
        &mut self.meta
    }
    fn order(&self, other: &Self) -> Ordering {
        (self.date, self.id()).cmp(&(other.date, other.id()))
    }
    fn table(catalog: &Catalog) -> &Table<Self> {
        &catalog.acquisitions
    }
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
        &mut catalog.acquisitions
    }
}

impl Record for Read {
    type Id = ReadId;
    const KIND: &'static str = "read";

    fn meta(&self) -> &Meta<ReadId> {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut Meta<ReadId> {
        &mut self.meta
    }
    fn order(&self, other: &Self) -> Ordering {
        (self.started, self.finished, self.id()).cmp(&(other.started, other.finished, other.id()))
    }
    fn table(catalog: &Catalog) -> &Table<Self> {
        &catalog.reads
    }
    fn table_mut(catalog: &mut Catalog) -> &mut Table<Self> {
        &mut catalog.reads
    }
}

/// Records that can be the target of an acquisition, read or file.
pub trait Attachable: Record {
    fn subject(&self) -> Subject;
}

impl Attachable for Book {
    fn subject(&self) -> Subject {
        Subject::Book(self.id())
    }
}

impl Attachable for Edition {
    fn subject(&self) -> Subject {
        Subject::Edition(self.id())
    }
}

impl Attachable for Issue {
    fn subject(&self) -> Subject {
        Subject::Issue(self.id())
    }
}

impl Attachable for Magazine {
    fn subject(&self) -> Subject {
        Subject::Magazine(self.id())
    }
}

impl Attachable for Paper {
    fn subject(&self) -> Subject {
        Subject::Paper(self.id())
    }
}
