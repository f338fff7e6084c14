use crate::error::{Result, ShelfError};
use crate::slug::Sluggable;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! entity_ids {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(
                Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
                Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub u64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<u64> for $name {
                fn from(id: u64) -> Self {
                    Self(id)
                }
            }

            impl From<$name> for u64 {
                fn from(id: $name) -> u64 {
                    id.0
                }
            }
        )*
    };
}

entity_ids!(
    GenreId,
    LanguageId,
    PublisherId,
    SeriesId,
    JournalId,
    MagazineId,
    IssueId,
    PersonId,
    LinkId,
    BookId,
    EditionId,
    PaperId,
    FileId,
    AcquisitionId,
    ReadId,
);

/// Surrogate key and system-managed timestamps shared by every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta<I> {
    pub id: I,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<I: Default> Meta<I> {
    /// Metadata for a record that has not been stored yet; the store assigns the id.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: I::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<I: Default> Default for Meta<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub meta: Meta<GenreId>,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub meta: Meta<LanguageId>,
    pub slug: String,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publisher {
    pub meta: Meta<PublisherId>,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub links: Vec<LinkId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub meta: Meta<SeriesId>,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub links: Vec<LinkId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub meta: Meta<JournalId>,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub links: Vec<LinkId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Magazine {
    pub meta: Meta<MagazineId>,
    pub slug: String,
    pub name: String,
    pub feed: Option<LinkId>,
    #[serde(default)]
    pub links: Vec<LinkId>,
}

/// One issue of a magazine, unique per (magazine, issue label).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub meta: Meta<IssueId>,
    pub magazine: MagazineId,
    pub issue: String,
    pub publishing_date: Option<NaiveDate>,
    /// Blob name of the cover image, set through `attach::set_cover`.
    pub cover: Option<String>,
    #[serde(default)]
    pub languages: Vec<LanguageId>,
    #[serde(default)]
    pub links: Vec<LinkId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub meta: Meta<PersonId>,
    pub slug: String,
    pub first_name: String,
    pub last_name: Option<String>,
    #[serde(default)]
    pub links: Vec<LinkId>,
}

impl Person {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub meta: Meta<LinkId>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub meta: Meta<BookId>,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<PersonId>,
    pub series: Option<SeriesId>,
    pub volume: Option<f64>,
    #[serde(default)]
    pub genres: Vec<GenreId>,
    #[serde(default)]
    pub links: Vec<LinkId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edition {
    pub meta: Meta<EditionId>,
    pub book: BookId,
    pub alternate_title: Option<String>,
    pub isbn: Option<String>,
    pub publishing_date: Option<NaiveDate>,
    pub publisher: Option<PublisherId>,
    pub binding: Option<String>,
    #[serde(default)]
    pub languages: Vec<LanguageId>,
    #[serde(default)]
    pub links: Vec<LinkId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub meta: Meta<PaperId>,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<PersonId>,
    pub journal: Option<JournalId>,
    pub volume: Option<String>,
    pub publishing_date: Option<NaiveDate>,
    #[serde(default)]
    pub languages: Vec<LanguageId>,
    #[serde(default)]
    pub links: Vec<LinkId>,
}

/// A catalog record that acquisitions, reads and files can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Subject {
    Book(BookId),
    Edition(EditionId),
    Issue(IssueId),
    Magazine(MagazineId),
    Paper(PaperId),
}

impl Subject {
    pub fn kind(&self) -> &'static str {
        match self {
            Subject::Book(_) => "book",
            Subject::Edition(_) => "edition",
            Subject::Issue(_) => "issue",
            Subject::Magazine(_) => "magazine",
            Subject::Paper(_) => "paper",
        }
    }

    pub fn raw_id(&self) -> u64 {
        match *self {
            Subject::Book(id) => id.0,
            Subject::Edition(id) => id.0,
            Subject::Issue(id) => id.0,
            Subject::Magazine(id) => id.0,
            Subject::Paper(id) => id.0,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.raw_id())
    }
}

impl FromStr for Subject {
    type Err = ShelfError;

    /// Parses `<kind>:<id>`, e.g. `edition:4`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ShelfError::invalid_value("subject", s, reason);
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected <kind>:<id>"))?;
        let id: u64 = id
            .trim()
            .parse()
            .map_err(|_| invalid("id must be a positive number"))?;
        match kind.trim().to_lowercase().as_str() {
            "book" => Ok(Subject::Book(BookId(id))),
            "edition" => Ok(Subject::Edition(EditionId(id))),
            "issue" => Ok(Subject::Issue(IssueId(id))),
            "magazine" => Ok(Subject::Magazine(MagazineId(id))),
            "paper" => Ok(Subject::Paper(PaperId(id))),
            _ => Err(invalid(
                "kind must be one of book, edition, issue, magazine, paper",
            )),
        }
    }
}

/// A binary attached to a subject. The bytes live in the blob store under `blob`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub meta: Meta<FileId>,
    pub subject: Subject,
    /// Original file name, for display.
    pub name: String,
    pub blob: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acquisition {
    pub meta: Meta<AcquisitionId>,
    pub subject: Subject,
    pub date: Option<NaiveDate>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Read {
    pub meta: Meta<ReadId>,
    pub subject: Subject,
    pub started: Option<NaiveDate>,
    pub finished: Option<NaiveDate>,
}

impl Read {
    pub fn in_progress(&self) -> bool {
        self.started.is_some() && self.finished.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadingStatus {
    Unread,
    Reading,
    Finished,
}

impl ReadingStatus {
    /// Reading wins over finished: a re-read in progress counts as reading.
    pub fn of<'a, I: IntoIterator<Item = &'a Read>>(reads: I) -> Self {
        let mut status = ReadingStatus::Unread;
        for read in reads {
            if read.in_progress() {
                return ReadingStatus::Reading;
            }
            if read.finished.is_some() {
                status = ReadingStatus::Finished;
            }
        }
        status
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReadingStatus::Unread => "unread",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Finished => "finished",
        };
        write!(f, "{}", s)
    }
}

/// Named, slugged records sharing the same create/get/list handling.
pub trait Named: Sluggable {
    fn with_name(name: String) -> Self;
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

macro_rules! named_record {
    ($ty:ident { $($field:ident: $default:expr),* $(,)? }) => {
        impl Sluggable for $ty {
            fn slug_source(&self) -> String {
                self.name.clone()
            }
            fn slug(&self) -> &str {
                &self.slug
            }
            fn set_slug(&mut self, slug: String) {
                self.slug = slug;
            }
        }

        impl Named for $ty {
            fn with_name(name: String) -> Self {
                Self {
                    meta: Meta::new(),
                    slug: String::new(),
                    name,
                    $($field: $default,)*
                }
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn set_name(&mut self, name: String) {
                self.name = name;
            }
        }
    };
}

named_record!(Genre {});
named_record!(Language { code: None });
named_record!(Publisher { links: Vec::new() });
named_record!(Series { links: Vec::new() });
named_record!(Journal { links: Vec::new() });
named_record!(Magazine {
    feed: None,
    links: Vec::new()
});

impl Sluggable for Person {
    fn slug_source(&self) -> String {
        self.full_name()
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }
}

impl Sluggable for Book {
    fn slug_source(&self) -> String {
        self.title.clone()
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }
}

impl Sluggable for Paper {
    fn slug_source(&self) -> String {
        self.title.clone()
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }
}
