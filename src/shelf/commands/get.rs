use crate::error::{Result, ShelfError};
use crate::model::*;
use crate::store::{Catalog, DataStore, Record};

/// Records that can be found from a free-text term.
pub trait Lookup: Record {
    /// Texts a term is matched against. The first one is the record's label.
    fn search_keys(&self, catalog: &Catalog) -> Vec<String>;

    fn label(&self, catalog: &Catalog) -> String {
        self.search_keys(catalog)
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}

macro_rules! named_lookup {
    ($($ty:ty),*) => {
        $(impl Lookup for $ty {
            fn search_keys(&self, _catalog: &Catalog) -> Vec<String> {
                vec![self.name.clone(), self.slug.clone()]
            }
        })*
    };
}

named_lookup!(Genre, Publisher, Series, Journal, Magazine);

impl Lookup for Language {
    fn search_keys(&self, _catalog: &Catalog) -> Vec<String> {
        let mut keys = vec![self.name.clone(), self.slug.clone()];
        keys.extend(self.code.clone());
        keys
    }
}

impl Lookup for Person {
    fn search_keys(&self, _catalog: &Catalog) -> Vec<String> {
        vec![self.full_name(), self.slug.clone()]
    }
}

impl Lookup for Link {
    fn search_keys(&self, _catalog: &Catalog) -> Vec<String> {
        vec![self.url.clone()]
    }
}

impl Lookup for Book {
    fn search_keys(&self, _catalog: &Catalog) -> Vec<String> {
        vec![self.title.clone(), self.slug.clone()]
    }
}

impl Lookup for Edition {
    fn search_keys(&self, catalog: &Catalog) -> Vec<String> {
        let mut keys = vec![catalog.edition_label(self)];
        keys.extend(self.isbn.clone());
        keys.extend(self.alternate_title.clone());
        keys.extend(catalog.books.get(self.book).map(|b| b.title.clone()));
        keys
    }
}

impl Lookup for Issue {
    fn search_keys(&self, catalog: &Catalog) -> Vec<String> {
        vec![catalog.issue_label(self), self.issue.clone()]
    }
}

impl Lookup for Paper {
    fn search_keys(&self, _catalog: &Catalog) -> Vec<String> {
        vec![self.title.clone(), self.slug.clone()]
    }
}

impl Lookup for File {
    fn search_keys(&self, catalog: &Catalog) -> Vec<String> {
        let mut keys = vec![self.name.clone()];
        keys.extend(catalog.describe(self.subject).ok());
        keys
    }
}

impl Lookup for Acquisition {
    fn search_keys(&self, catalog: &Catalog) -> Vec<String> {
        vec![catalog
            .describe(self.subject)
            .unwrap_or_else(|_| self.subject.to_string())]
    }
}

impl Lookup for Read {
    fn search_keys(&self, catalog: &Catalog) -> Vec<String> {
        vec![catalog
            .describe(self.subject)
            .unwrap_or_else(|_| self.subject.to_string())]
    }
}

/// 1 for an exact (case-insensitive) match, 2 for a substring match.
fn score(keys: &[String], term_lower: &str) -> Option<u8> {
    let lowered: Vec<String> = keys.iter().map(|k| k.to_lowercase()).collect();
    if lowered.iter().any(|k| k == term_lower) {
        Some(1)
    } else if lowered.iter().any(|k| k.contains(term_lower)) {
        Some(2)
    } else {
        None
    }
}

/// Rows matching `term`, best match first.
///
/// Exact matches rank before substring matches; within a rank shorter labels
/// come first, then older records.
pub fn search<R: Lookup>(catalog: &Catalog, term: &str) -> Vec<R> {
    let term_lower = term.trim().to_lowercase();
    if term_lower.is_empty() {
        return catalog.list::<R>();
    }

    let mut matches: Vec<(R, u8, usize)> = R::table(catalog)
        .iter()
        .filter_map(|row| {
            let keys = row.search_keys(catalog);
            let rank = score(&keys, &term_lower)?;
            let label_len = keys.first().map(|k| k.chars().count()).unwrap_or(0);
            Some((row.clone(), rank, label_len))
        })
        .collect();

    matches.sort_by(|(a, rank_a, len_a), (b, rank_b, len_b)| {
        rank_a
            .cmp(rank_b)
            .then(len_a.cmp(len_b))
            .then(a.meta().created_at.cmp(&b.meta().created_at))
            .then(a.id().cmp(&b.id()))
    });

    matches.into_iter().map(|(row, _, _)| row).collect()
}

/// The record `term` refers to: an id, or the best text match.
pub fn by_term<R: Lookup>(catalog: &Catalog, term: &str) -> Result<R> {
    let term = term.trim();
    if let Ok(id) = term.parse::<u64>() {
        if let Some(row) = R::table(catalog).get(R::Id::from(id)) {
            return Ok(row.clone());
        }
    }
    if term.is_empty() {
        return Err(ShelfError::not_found(R::KIND, term));
    }
    search::<R>(catalog, term)
        .into_iter()
        .next()
        .ok_or_else(|| ShelfError::not_found(R::KIND, term))
}

pub fn run<S: DataStore, R: Lookup>(store: &S, term: &str) -> Result<R> {
    store.read(|catalog| by_term::<R>(catalog, term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn store_with_books(titles: &[&str]) -> InMemoryStore {
        titles
            .iter()
            .fold(StoreFixture::new(), |fixture, title| fixture.with_book(title))
            .store
    }

    #[test]
    fn editions_match_on_isbn_and_book_title() {
        let store = StoreFixture::new()
            .with_book("Dune")
            .with_edition(BookId(1), "9780441013593")
            .store;
        let by_isbn: Edition = run(&store, "9780441013593").unwrap();
        let by_title: Edition = run(&store, "dune").unwrap();
        assert_eq!(by_isbn.meta.id, by_title.meta.id);
    }

    #[test]
    fn genres_match_name_or_slug() {
        let store = StoreFixture::new()
            .with_genres(&["Science Fiction", "Fantasy"])
            .store;
        let genre: Genre = run(&store, "science-fiction").unwrap();
        assert_eq!(genre.name, "Science Fiction");
    }

    #[test]
    fn finds_by_id() {
        let store = store_with_books(&["Dune", "Emma"]);
        let book: Book = run(&store, "2").unwrap();
        assert_eq!(book.title, "Emma");
    }

    #[test]
    fn exact_title_beats_substring() {
        let store = store_with_books(&["Dune Messiah", "Dune"]);
        let book: Book = run(&store, "dune").unwrap();
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn matches_slugs() {
        let store = store_with_books(&["The Left Hand of Darkness"]);
        let book: Book = run(&store, "the-left-hand-of-darkness").unwrap();
        assert_eq!(book.title, "The Left Hand of Darkness");
    }

    #[test]
    fn substring_prefers_shorter_titles() {
        let store = store_with_books(&["Children of Dune", "Dune Messiah", "Emma"]);
        let found: Vec<Book> = store.read(|c| Ok(search(c, "dune"))).unwrap();
        let titles: Vec<_> = found.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune Messiah", "Children of Dune"]);
    }

    #[test]
    fn no_match_is_not_found() {
        let store = store_with_books(&["Dune"]);
        let err = run::<_, Book>(&store, "Emma").unwrap_err();
        assert!(matches!(err, ShelfError::NotFound { kind: "book", .. }));
        assert!(run::<_, Book>(&store, "   ").is_err());
    }

    #[test]
    fn numeric_titles_still_match_as_text() {
        let store = store_with_books(&["1984"]);
        let book: Book = run(&store, "1984").unwrap();
        assert_eq!(book.title, "1984");
    }
}
