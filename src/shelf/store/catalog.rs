use super::record::{Record, UniqueKey};
use crate::error::{Result, ShelfError};
use crate::model::*;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a get-or-create.
#[derive(Debug, Clone)]
pub enum Created<T> {
    New(T),
    Existing(T),
}

impl<T> Created<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Created::New(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Created::New(t) | Created::Existing(t) => t,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Created::New(t) | Created::Existing(t) => t,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Created<U> {
        match self {
            Created::New(t) => Created::New(f(t)),
            Created::Existing(t) => Created::Existing(f(t)),
        }
    }
}

/// Rows of one record type keyed by id, with an auto-incrementing counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<R> {
    next_id: u64,
    rows: BTreeMap<u64, R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<R: Record> Table<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.rows.get(&id.into())
    }

    pub fn contains(&self, id: R::Id) -> bool {
        self.rows.contains_key(&id.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    /// All rows in the record's defined ordering.
    pub fn sorted(&self) -> Vec<R> {
        let mut rows: Vec<R> = self.rows.values().cloned().collect();
        rows.sort_by(|a, b| a.order(b));
        rows
    }

    fn check_unique(&self, record: &R) -> Result<()> {
        let own: u64 = record.id().into();
        // an empty key (a name with nothing sluggable) never clashes
        for (field, value) in record.unique_keys().into_iter().filter(|(_, v)| !v.is_empty()) {
            let taken = self
                .rows
                .iter()
                .filter(|(id, _)| **id != own)
                .any(|(_, row)| row.unique_keys().contains(&(field, value.clone())));
            if taken {
                return Err(ShelfError::Uniqueness {
                    kind: R::KIND,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, mut record: R) -> Result<R> {
        record.before_save(None);
        let now = Utc::now();
        let id = R::Id::from(self.next_id);
        {
            let meta = record.meta_mut();
            meta.id = id;
            meta.created_at = now;
            meta.updated_at = now;
        }
        self.check_unique(&record)?;
        self.next_id += 1;
        self.rows.insert(id.into(), record.clone());
        Ok(record)
    }

    pub fn update(&mut self, mut record: R) -> Result<R> {
        let id = record.id();
        let previous = self
            .get(id)
            .cloned()
            .ok_or_else(|| ShelfError::not_found(R::KIND, id.to_string()))?;
        record.before_save(Some(&previous));
        {
            let meta = record.meta_mut();
            meta.created_at = previous.meta().created_at;
            meta.updated_at = Utc::now();
        }
        self.check_unique(&record)?;
        self.rows.insert(id.into(), record.clone());
        Ok(record)
    }

    pub fn find_natural(&self, key: &UniqueKey) -> Option<&R> {
        self.rows
            .values()
            .find(|row| row.natural_key().as_ref() == Some(key))
    }

    /// Returns the row sharing `candidate`'s natural key, or inserts it.
    pub fn get_or_insert(&mut self, candidate: R) -> Result<Created<R>> {
        if let Some(key) = candidate.natural_key() {
            if let Some(existing) = self.find_natural(&key) {
                return Ok(Created::Existing(existing.clone()));
            }
        }
        self.insert(candidate).map(Created::New)
    }

    pub fn remove(&mut self, id: R::Id) -> Option<R> {
        self.rows.remove(&id.into())
    }

    /// Removes every row matching `pred`, returning them.
    pub fn remove_where(&mut self, pred: impl Fn(&R) -> bool) -> Vec<R> {
        let ids: Vec<u64> = self
            .rows
            .iter()
            .filter(|(_, row)| pred(row))
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.rows.remove(&id))
            .collect()
    }

    /// Applies `f` to every row, touching `updated_at` where it returns true.
    pub fn update_where(&mut self, mut f: impl FnMut(&mut R) -> bool) {
        let now = Utc::now();
        for row in self.rows.values_mut() {
            if f(row) {
                row.meta_mut().updated_at = now;
            }
        }
    }
}

/// The whole library: one table per record type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub genres: Table<Genre>,
    #[serde(default)]
    pub languages: Table<Language>,
    #[serde(default)]
    pub publishers: Table<Publisher>,
    #[serde(default)]
    pub series: Table<Series>,
    #[serde(default)]
    pub journals: Table<Journal>,
    #[serde(default)]
    pub magazines: Table<Magazine>,
    #[serde(default)]
    pub issues: Table<Issue>,
    #[serde(default)]
    pub persons: Table<Person>,
    #[serde(default)]
    pub links: Table<Link>,
    #[serde(default)]
    pub books: Table<Book>,
    #[serde(default)]
    pub editions: Table<Edition>,
    #[serde(default)]
    pub papers: Table<Paper>,
    #[serde(default)]
    pub files: Table<File>,
    #[serde(default)]
    pub acquisitions: Table<Acquisition>,
    #[serde(default)]
    pub reads: Table<Read>,
}

impl Catalog {
    pub fn get<R: Record>(&self, id: R::Id) -> Result<R> {
        R::table(self)
            .get(id)
            .cloned()
            .ok_or_else(|| ShelfError::not_found(R::KIND, id.to_string()))
    }

    pub fn list<R: Record>(&self) -> Vec<R> {
        R::table(self).sorted()
    }

    pub fn insert<R: Record>(&mut self, record: R) -> Result<R> {
        R::table_mut(self).insert(record)
    }

    pub fn update<R: Record>(&mut self, record: R) -> Result<R> {
        R::table_mut(self).update(record)
    }

    pub fn get_or_insert<R: Record>(&mut self, candidate: R) -> Result<Created<R>> {
        R::table_mut(self).get_or_insert(candidate)
    }

    pub fn remove<R: Record>(&mut self, id: R::Id) -> Result<R> {
        R::table_mut(self)
            .remove(id)
            .ok_or_else(|| ShelfError::not_found(R::KIND, id.to_string()))
    }

    /// Get-or-create the link for `url`.
    pub fn link_for(&mut self, url: &str) -> Result<LinkId> {
        let link = Link {
            meta: Meta::new(),
            url: url.trim().to_string(),
        };
        Ok(self.get_or_insert(link)?.into_inner().meta.id)
    }

    pub fn subject_exists(&self, subject: Subject) -> bool {
        match subject {
            Subject::Book(id) => self.books.contains(id),
            Subject::Edition(id) => self.editions.contains(id),
            Subject::Issue(id) => self.issues.contains(id),
            Subject::Magazine(id) => self.magazines.contains(id),
            Subject::Paper(id) => self.papers.contains(id),
        }
    }

    /// Display label of the record a subject points at.
    pub fn describe(&self, subject: Subject) -> Result<String> {
        let missing = || ShelfError::not_found(subject.kind(), subject.to_string());
        match subject {
            Subject::Book(id) => self.books.get(id).map(|b| b.title.clone()).ok_or_else(missing),
            Subject::Edition(id) => {
                let edition = self.editions.get(id).ok_or_else(missing)?;
                Ok(self.edition_label(edition))
            }
            Subject::Issue(id) => {
                let issue = self.issues.get(id).ok_or_else(missing)?;
                Ok(self.issue_label(issue))
            }
            Subject::Magazine(id) => self
                .magazines
                .get(id)
                .map(|m| m.name.clone())
                .ok_or_else(missing),
            Subject::Paper(id) => self.papers.get(id).map(|p| p.title.clone()).ok_or_else(missing),
        }
    }

    pub fn edition_label(&self, edition: &Edition) -> String {
        let title = edition.alternate_title.clone().unwrap_or_else(|| {
            self.books
                .get(edition.book)
                .map(|b| b.title.clone())
                .unwrap_or_default()
        });
        match (&edition.isbn, edition.publishing_date) {
            (Some(isbn), _) => format!("{} ({})", title, isbn),
            (None, Some(date)) => format!("{} ({})", title, date.format("%Y")),
            (None, None) => title,
        }
    }

    pub fn issue_label(&self, issue: &Issue) -> String {
        let magazine = self
            .magazines
            .get(issue.magazine)
            .map(|m| m.name.as_str())
            .unwrap_or_default();
        format!("{} {}", magazine, issue.issue)
    }

    pub fn person_names(&self, ids: &[PersonId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.persons.get(*id))
            .map(Person::full_name)
            .collect()
    }

    pub fn urls(&self, ids: &[LinkId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.links.get(*id))
            .map(|l| l.url.clone())
            .collect()
    }

    pub fn language_names(&self, ids: &[LanguageId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.languages.get(*id))
            .map(|l| l.name.clone())
            .collect()
    }

    pub fn acquisitions_of(&self, subject: Subject) -> Vec<Acquisition> {
        let mut rows: Vec<_> = self
            .acquisitions
            .iter()
            .filter(|a| a.subject == subject)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.order(b));
        rows
    }

    pub fn reads_of(&self, subject: Subject) -> Vec<Read> {
        let mut rows: Vec<_> = self
            .reads
            .iter()
            .filter(|r| r.subject == subject)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.order(b));
        rows
    }

    pub fn files_of(&self, subject: Subject) -> Vec<File> {
        let mut rows: Vec<_> = self
            .files
            .iter()
            .filter(|f| f.subject == subject)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.order(b));
        rows
    }

    /// Removes the acquisitions, reads and files attached to `subject`.
    ///
    /// Returns the removed file records so the caller can delete their blobs.
    pub fn detach(&mut self, subject: Subject) -> Detached {
        Detached {
            acquisitions: self.acquisitions.remove_where(|a| a.subject == subject).len(),
            reads: self.reads.remove_where(|r| r.subject == subject).len(),
            files: self.files.remove_where(|f| f.subject == subject),
            blobs: Vec::new(),
        }
    }
}

/// What a cascade removed along with its subject.
#[derive(Debug, Default)]
pub struct Detached {
    pub acquisitions: usize,
    pub reads: usize,
    pub files: Vec<File>,
    /// Blobs owned by removed records themselves, such as issue covers.
    pub blobs: Vec<String>,
}

impl Detached {
    pub fn absorb(&mut self, other: Detached) {
        self.acquisitions += other.acquisitions;
        self.reads += other.reads;
        self.files.extend(other.files);
        self.blobs.extend(other.blobs);
    }

    pub fn is_empty(&self) -> bool {
        self.acquisitions == 0 && self.reads == 0 && self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Named;

    #[test]
    fn insert_assigns_increasing_ids_and_slug() {
        let mut catalog = Catalog::default();
        let a = catalog.insert(Genre::with_name("Science Fiction".into())).unwrap();
        let b = catalog.insert(Genre::with_name("Fantasy".into())).unwrap();
        assert_eq!(a.meta.id, GenreId(1));
        assert_eq!(b.meta.id, GenreId(2));
        assert_eq!(a.slug, "science-fiction");
    }

    #[test]
    fn duplicate_name_is_a_uniqueness_violation() {
        let mut catalog = Catalog::default();
        catalog.insert(Genre::with_name("Horror".into())).unwrap();
        let err = catalog
            .insert(Genre::with_name("Horror".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            ShelfError::Uniqueness {
                kind: "genre",
                field: "name",
                ..
            }
        ));
        assert_eq!(catalog.genres.len(), 1);
    }

    #[test]
    fn non_latin_names_get_distinct_slugs() {
        let mut catalog = Catalog::default();
        let a = catalog.insert(Genre::with_name("日本文学".into())).unwrap();
        let b = catalog.insert(Genre::with_name("中国文学".into())).unwrap();
        assert_eq!(a.slug, "日本文学");
        assert_eq!(b.slug, "中国文学");
        assert_eq!(catalog.genres.len(), 2);
    }

    #[test]
    fn empty_slugs_do_not_clash() {
        let mut catalog = Catalog::default();
        catalog.insert(Genre::with_name("???".into())).unwrap();
        catalog.insert(Genre::with_name("!!!".into())).unwrap();
        assert_eq!(catalog.genres.len(), 2);
    }

    #[test]
    fn colliding_slugs_are_rejected() {
        let mut catalog = Catalog::default();
        catalog.insert(Genre::with_name("Sci-Fi".into())).unwrap();
        let err = catalog.insert(Genre::with_name("Sci Fi".into())).unwrap_err();
        assert!(matches!(err, ShelfError::Uniqueness { field: "slug", .. }));
    }

    #[test]
    fn failed_insert_does_not_consume_an_id() {
        let mut catalog = Catalog::default();
        catalog.insert(Genre::with_name("Horror".into())).unwrap();
        let _ = catalog.insert(Genre::with_name("Horror".into()));
        let next = catalog.insert(Genre::with_name("Crime".into())).unwrap();
        assert_eq!(next.meta.id, GenreId(2));
    }

    #[test]
    fn get_or_insert_returns_existing_row() {
        let mut catalog = Catalog::default();
        let first = catalog
            .get_or_insert(Genre::with_name("Poetry".into()))
            .unwrap();
        let second = catalog
            .get_or_insert(Genre::with_name("Poetry".into()))
            .unwrap();
        assert!(first.was_created());
        assert!(!second.was_created());
        assert_eq!(first.get().meta.id, second.get().meta.id);
    }

    #[test]
    fn update_keeps_created_at_and_checks_uniqueness_against_others() {
        let mut catalog = Catalog::default();
        let horror = catalog.insert(Genre::with_name("Horror".into())).unwrap();
        catalog.insert(Genre::with_name("Crime".into())).unwrap();

        let mut same = horror.clone();
        same.meta.created_at = Utc::now() + chrono::Duration::days(1);
        let saved = catalog.update(same).unwrap();
        assert_eq!(saved.meta.created_at, horror.meta.created_at);

        let mut clash = horror.clone();
        clash.name = "Crime".into();
        assert!(catalog.update(clash).is_err());
        assert_eq!(catalog.get::<Genre>(horror.meta.id).unwrap().name, "Horror");
    }

    #[test]
    fn missing_rows_are_not_found() {
        let catalog = Catalog::default();
        assert!(matches!(
            catalog.get::<Book>(BookId(9)),
            Err(ShelfError::NotFound { kind: "book", .. })
        ));
    }

    #[test]
    fn list_uses_record_ordering() {
        let mut catalog = Catalog::default();
        catalog.insert(Genre::with_name("thriller".into())).unwrap();
        catalog.insert(Genre::with_name("Adventure".into())).unwrap();
        let names: Vec<_> = catalog.list::<Genre>().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Adventure", "thriller"]);
    }

    #[test]
    fn link_for_reuses_urls() {
        let mut catalog = Catalog::default();
        let a = catalog.link_for("https://example.org").unwrap();
        let b = catalog.link_for(" https://example.org ").unwrap();
        assert_eq!(a, b);
        assert_eq!(catalog.links.len(), 1);
    }

    #[test]
    fn catalog_survives_json() {
        let mut catalog = Catalog::default();
        catalog.insert(Genre::with_name("Essay".into())).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let mut back: Catalog = serde_json::from_str(&json).unwrap();
        let next = back.insert(Genre::with_name("Drama".into())).unwrap();
        assert_eq!(next.meta.id, GenreId(2));
        assert_eq!(back.genres.len(), 2);
    }
}
