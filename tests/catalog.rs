use shelf::api::{ShelfApi, ShelfPaths};
use shelf::commands::create::NewBook;
use shelf::error::ShelfError;
use shelf::model::*;
use shelf::store::fs::FileStore;
use shelf::store::DataStore;
use tempfile::TempDir;

fn api() -> (TempDir, ShelfApi<FileStore>) {
    let dir = TempDir::new().unwrap();
    let paths = ShelfPaths {
        data: dir.path().to_path_buf(),
    };
    let store = FileStore::new(dir.path().to_path_buf());
    (dir, ShelfApi::new(store, paths))
}

#[test]
fn genre_get_or_create_is_idempotent() {
    let (_dir, mut api) = api();

    let first = api.create_named::<Genre>("Science Fiction").unwrap();
    assert!(first.was_created());
    assert_eq!(first.get().slug, "science-fiction");

    let second = api.create_named::<Genre>("Science Fiction").unwrap();
    assert!(!second.was_created());
    assert_eq!(second.get().meta.id, first.get().meta.id);

    assert_eq!(api.records::<Genre>(None).unwrap().len(), 1);
}

#[test]
fn non_latin_names_stay_distinct() {
    let (_dir, mut api) = api();

    let japanese = api.create_named::<Genre>("日本文学").unwrap();
    let chinese = api.create_named::<Genre>("中国文学").unwrap();
    assert!(chinese.was_created());
    assert_ne!(japanese.get().slug, chinese.get().slug);

    api.create_book(NewBook {
        title: "静夜思".into(),
        authors: vec!["李白".into()],
        ..NewBook::default()
    })
    .unwrap();
    api.create_book(NewBook {
        title: "春望".into(),
        authors: vec!["杜甫".into()],
        ..NewBook::default()
    })
    .unwrap();

    assert_eq!(api.records::<Person>(None).unwrap().len(), 2);
    let li_bai: Book = api.get("静夜思").unwrap();
    let du_fu: Book = api.get("春望").unwrap();
    assert_ne!(li_bai.authors, du_fu.authors);
}

#[test]
fn slug_follows_name_changes_only() {
    let (_dir, mut api) = api();
    api.create_named::<Genre>("Science Fiction").unwrap();

    let same = api.edit::<Genre>("1", "name", "Science Fiction").unwrap();
    assert_eq!(same.value.slug, "science-fiction");

    let renamed = api.edit::<Genre>("1", "name", "Speculative Fiction").unwrap();
    assert_eq!(renamed.value.slug, "speculative-fiction");
    assert!(matches!(
        api.get::<Genre>("science-fiction"),
        Err(ShelfError::NotFound { .. })
    ));
}

#[test]
fn bogus_field_never_mutates() {
    let (_dir, mut api) = api();
    api.create_book(NewBook::titled("Solaris")).unwrap();
    let before: Book = api.get("1").unwrap();

    assert!(matches!(
        api.edit::<Book>("1", "bogus_field", "x"),
        Err(ShelfError::InvalidField { kind: "book", .. })
    ));

    let after: Book = api.get("1").unwrap();
    assert_eq!(after.title, before.title);
    assert_eq!(after.meta.updated_at, before.meta.updated_at);
}

#[test]
fn deleting_a_file_removes_its_blob() {
    let (_dir, mut api) = api();
    api.create_book(NewBook::titled("Solaris")).unwrap();
    let file = api.attach_bytes("book:1", "solaris.epub", b"epub").unwrap();
    assert!(api.file_path("solaris").unwrap().exists());

    let deleted = api.delete::<File>("solaris").unwrap();
    assert_eq!(deleted.value.blob, file.blob);
    assert!(matches!(
        api.store().get_blob(&file.blob),
        Err(ShelfError::NotFound { kind: "blob", .. })
    ));
}

#[test]
fn finishing_a_read_changes_status() {
    let (_dir, mut api) = api();
    api.create_book(NewBook::titled("Solaris")).unwrap();

    let read = api.add_read("book:solaris", "2024-03-01", "").unwrap();
    assert_eq!(api.status("book:1").unwrap().reading, ReadingStatus::Reading);

    api.edit::<Read>(&read.meta.id.to_string(), "finished", "2024-03-20")
        .unwrap();
    assert_eq!(
        api.status("book:1").unwrap().reading,
        ReadingStatus::Finished
    );
}

#[test]
fn deleting_a_book_cascades_to_attachments() {
    let (_dir, mut api) = api();
    api.create_book(NewBook::titled("Solaris")).unwrap();
    api.add_acquisition("book:1", "2023-12-24", "9.99").unwrap();
    let file = api.attach_bytes("book:1", "cover.png", b"png").unwrap();

    api.delete::<Book>("solaris").unwrap();

    assert!(api.records::<Acquisition>(None).unwrap().is_empty());
    assert!(api.records::<File>(None).unwrap().is_empty());
    assert!(api.store().get_blob(&file.blob).is_err());
}

#[test]
fn catalog_survives_reopening() {
    let (dir, mut api) = api();
    api.create_book(NewBook {
        title: "Solaris".into(),
        authors: vec!["Stanisław Lem".into()],
        ..NewBook::default()
    })
    .unwrap();
    drop(api);

    let reopened = ShelfApi::new(
        FileStore::new(dir.path().to_path_buf()),
        ShelfPaths {
            data: dir.path().to_path_buf(),
        },
    );
    let book: Book = reopened.get("solaris").unwrap();
    assert_eq!(book.authors.len(), 1);
    let person: Person = reopened.get("lem").unwrap();
    assert_eq!(person.last_name.as_deref(), Some("Lem"));
}

#[test]
fn lookahead_marks_the_last_row() {
    let flags: Vec<bool> = ruled::lookahead(1..=4).map(|(_, more)| more).collect();
    assert_eq!(flags, vec![true, true, true, false]);
    assert_eq!(ruled::lookahead(Vec::<u8>::new()).count(), 0);
    assert_eq!(ruled::lookahead_opt(None::<Vec<u8>>).count(), 0);
}
