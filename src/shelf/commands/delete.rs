//! Deletion and its cascades.
//!
//! Removing a record also removes what only makes sense with it: editions of a
//! book, issues of a magazine and everything attached to a subject. Shared
//! records (people, genres, links...) are unhooked from their owners instead.
//! Blobs of removed files are deleted after the catalog change is committed.

use super::attach;
use super::get::{self, Lookup};
use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::*;
use crate::store::{Catalog, DataStore, Detached, Record};
use tracing::{info, warn};

pub trait Cascade: Lookup {
    /// Cleans up after `removed` was taken out of its table.
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached;
}

fn drop_id<T: PartialEq>(ids: &mut Vec<T>, id: T) -> bool {
    let before = ids.len();
    ids.retain(|x| *x != id);
    ids.len() != before
}

fn clear_if<T: PartialEq>(slot: &mut Option<T>, id: T) -> bool {
    if slot.as_ref() == Some(&id) {
        *slot = None;
        true
    } else {
        false
    }
}

impl Cascade for Genre {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let id = removed.meta.id;
        catalog.books.update_where(|b| drop_id(&mut b.genres, id));
        Detached::default()
    }
}

impl Cascade for Language {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let id = removed.meta.id;
        catalog.editions.update_where(|e| drop_id(&mut e.languages, id));
        catalog.issues.update_where(|i| drop_id(&mut i.languages, id));
        catalog.papers.update_where(|p| drop_id(&mut p.languages, id));
        Detached::default()
    }
}

impl Cascade for Publisher {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let id = removed.meta.id;
        catalog.editions.update_where(|e| clear_if(&mut e.publisher, id));
        Detached::default()
    }
}

impl Cascade for Series {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let id = removed.meta.id;
        catalog.books.update_where(|b| clear_if(&mut b.series, id));
        Detached::default()
    }
}

impl Cascade for Journal {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let id = removed.meta.id;
        catalog.papers.update_where(|p| clear_if(&mut p.journal, id));
        Detached::default()
    }
}

impl Cascade for Person {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let id = removed.meta.id;
        catalog.books.update_where(|b| drop_id(&mut b.authors, id));
        catalog.papers.update_where(|p| drop_id(&mut p.authors, id));
        Detached::default()
    }
}

impl Cascade for Link {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let id = removed.meta.id;
        catalog.publishers.update_where(|r| drop_id(&mut r.links, id));
        catalog.series.update_where(|r| drop_id(&mut r.links, id));
        catalog.journals.update_where(|r| drop_id(&mut r.links, id));
        catalog.magazines.update_where(|r| {
            let feed = clear_if(&mut r.feed, id);
            drop_id(&mut r.links, id) || feed
        });
        catalog.issues.update_where(|r| drop_id(&mut r.links, id));
        catalog.persons.update_where(|r| drop_id(&mut r.links, id));
        catalog.books.update_where(|r| drop_id(&mut r.links, id));
        catalog.editions.update_where(|r| drop_id(&mut r.links, id));
        catalog.papers.update_where(|r| drop_id(&mut r.links, id));
        Detached::default()
    }
}

impl Cascade for Magazine {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let id = removed.meta.id;
        let mut detached = catalog.detach(Subject::Magazine(id));
        for issue in catalog.issues.remove_where(|i| i.magazine == id) {
            detached.absorb(Issue::cascade(catalog, &issue));
        }
        detached
    }
}

impl Cascade for Issue {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let mut detached = catalog.detach(Subject::Issue(removed.meta.id));
        detached.blobs.extend(removed.cover.clone());
        detached
    }
}

impl Cascade for Book {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        let id = removed.meta.id;
        let mut detached = catalog.detach(Subject::Book(id));
        for edition in catalog.editions.remove_where(|e| e.book == id) {
            detached.absorb(Edition::cascade(catalog, &edition));
        }
        detached
    }
}

impl Cascade for Edition {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        catalog.detach(Subject::Edition(removed.meta.id))
    }
}

impl Cascade for Paper {
    fn cascade(catalog: &mut Catalog, removed: &Self) -> Detached {
        catalog.detach(Subject::Paper(removed.meta.id))
    }
}

impl Cascade for File {
    fn cascade(_catalog: &mut Catalog, removed: &Self) -> Detached {
        Detached {
            files: vec![removed.clone()],
            ..Detached::default()
        }
    }
}

impl Cascade for Acquisition {
    fn cascade(_catalog: &mut Catalog, _removed: &Self) -> Detached {
        Detached::default()
    }
}

impl Cascade for Read {
    fn cascade(_catalog: &mut Catalog, _removed: &Self) -> Detached {
        Detached::default()
    }
}

pub fn run<S: DataStore, R: Cascade>(store: &mut S, term: &str) -> Result<CmdResult<R>> {
    let (removed, label, detached) = store.write(|catalog| {
        let record = get::by_term::<R>(catalog, term)?;
        let label = record.label(catalog);
        let removed = catalog.remove::<R>(record.id())?;
        let detached = R::cascade(catalog, &removed);
        Ok((removed, label, detached))
    })?;

    let mut result = CmdResult::new(removed);
    result.add_message(CmdMessage::success(format!(
        "Deleted {} {}: {}",
        R::KIND,
        result.value.id(),
        label
    )));

    if !detached.is_empty() {
        info!(
            kind = R::KIND,
            acquisitions = detached.acquisitions,
            reads = detached.reads,
            files = detached.files.len(),
            "cascade removed attachments"
        );
        // A deleted file is its own cascade; only report real extras.
        if R::KIND != File::KIND {
            result.add_message(CmdMessage::info(format!(
                "Also removed {} acquisition(s), {} read(s), {} file(s)",
                detached.acquisitions,
                detached.reads,
                detached.files.len()
            )));
        }
    }

    for file in &detached.files {
        if let Err(e) = store.delete_blob(&file.blob) {
            warn!(blob = %file.blob, error = %e, "could not delete blob");
            result.add_message(CmdMessage::warning(format!(
                "Could not delete stored file {} ({}): {}",
                file.name, file.blob, e
            )));
        }
    }
    for blob in &detached.blobs {
        if let Some(warning) = attach::discard_blob(store, blob) {
            result.add_message(warning);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create::{self, NewBook, NewEdition, NewIssue};
    use crate::commands::{attach, edit, MessageLevel};
    use crate::error::ShelfError;
    use crate::store::memory::InMemoryStore;

    fn library() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        create::book(
            &mut store,
            NewBook {
                title: "Dune".into(),
                authors: vec!["Frank Herbert".into()],
                genres: vec!["Science Fiction".into()],
                links: vec!["https://dune.example".into()],
                ..NewBook::default()
            },
        )
        .unwrap();
        create::edition(
            &mut store,
            NewEdition {
                book: "Dune".into(),
                isbn: Some("9780441013593".into()),
                ..NewEdition::default()
            },
        )
        .unwrap();
        store
    }

    #[test]
    fn deleting_a_genre_unhooks_books() {
        let mut store = library();
        let result = run::<_, Genre>(&mut store, "science fiction").unwrap();
        assert_eq!(result.value.name, "Science Fiction");
        assert_eq!(result.messages[0].level, MessageLevel::Success);

        let book = get::run::<_, Book>(&store, "Dune").unwrap();
        assert!(book.genres.is_empty());
    }

    #[test]
    fn deleting_a_link_unhooks_every_owner() {
        let mut store = library();
        run::<_, Link>(&mut store, "https://dune.example").unwrap();
        let book = get::run::<_, Book>(&store, "Dune").unwrap();
        assert!(book.links.is_empty());
    }

    #[test]
    fn deleting_a_book_cascades_to_editions_and_attachments() {
        let mut store = library();
        attach::add_acquisition(&mut store, "edition:1", "2023-04-01", "9.99").unwrap();
        attach::add_read(&mut store, "book:1", "2023-05-01", "").unwrap();
        attach::attach_bytes(&mut store, "edition:1", "cover.jpg", b"jpeg").unwrap();
        assert_eq!(store.blob_count(), 1);

        let result = run::<_, Book>(&mut store, "Dune").unwrap();
        assert_eq!(result.messages.len(), 2);

        store
            .read(|c| {
                assert!(c.editions.is_empty());
                assert!(c.acquisitions.is_empty());
                assert!(c.reads.is_empty());
                assert!(c.files.is_empty());
                assert_eq!(c.persons.len(), 1);
                Ok(())
            })
            .unwrap();
        assert_eq!(store.blob_count(), 0);
    }

    #[test]
    fn deleting_a_magazine_removes_its_issues() {
        let mut store = InMemoryStore::new();
        create::magazine(&mut store, "Analog", None).unwrap();
        create::issue(
            &mut store,
            NewIssue {
                magazine: "Analog".into(),
                issue: "2024-01".into(),
                ..NewIssue::default()
            },
        )
        .unwrap();
        attach::add_read(&mut store, "issue:1", "", "").unwrap();

        run::<_, Magazine>(&mut store, "analog").unwrap();
        store
            .read(|c| {
                assert!(c.issues.is_empty());
                assert!(c.reads.is_empty());
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn deleting_a_file_deletes_its_blob() {
        let mut store = library();
        let file = attach::attach_bytes(&mut store, "book:1", "notes.txt", b"notes").unwrap();

        let result = run::<_, File>(&mut store, "notes.txt").unwrap();
        assert_eq!(result.messages.len(), 1);
        assert!(matches!(
            store.get_blob(&file.blob),
            Err(ShelfError::NotFound { .. })
        ));
    }

    #[test]
    fn missing_blob_is_a_warning_not_an_error() {
        let mut store = library();
        let file = attach::attach_bytes(&mut store, "book:1", "notes.txt", b"notes").unwrap();
        store.delete_blob(&file.blob).unwrap();

        let result = run::<_, File>(&mut store, "notes.txt").unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning));
        assert!(store.read(|c| Ok(c.files.is_empty())).unwrap());
    }

    #[test]
    fn deleting_an_attachment_leaves_its_subject() {
        let mut store = library();
        attach::add_acquisition(&mut store, "book:1", "", "12").unwrap();
        edit::run::<_, Acquisition>(&mut store, "1", "price", "15").unwrap();
        run::<_, Acquisition>(&mut store, "1").unwrap();
        assert!(get::run::<_, Book>(&store, "1").is_ok());
    }

    #[test]
    fn unknown_record_is_not_found() {
        let mut store = library();
        assert!(matches!(
            run::<_, Paper>(&mut store, "anything"),
            Err(ShelfError::NotFound { kind: "paper", .. })
        ));
    }
}
