//! Acquisitions, reads and files attached to a subject.
//!
//! A subject is named as `<kind>:<id>` (`edition:4`) or `<kind>:<term>`
//! (`book:dune`), a non-numeric term resolved like any other lookup.
//! Editing and deleting attachments goes through the generic `edit` and
//! `delete` commands.
//!
//! Issue covers live in the same blob store as files but belong to the issue
//! itself, so they are set and cleared here rather than through `edit`.

use super::get;
use super::helpers::{parse_date, parse_number, required_text};
use super::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfError};
use crate::model::*;
use crate::store::{Attachable, Catalog, DataStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

pub fn resolve_subject(catalog: &Catalog, term: &str) -> Result<Subject> {
    if let Ok(subject) = term.parse::<Subject>() {
        if catalog.subject_exists(subject) {
            return Ok(subject);
        }
        return Err(ShelfError::not_found(subject.kind(), subject.to_string()));
    }
    let (kind, rest) = term.split_once(':').ok_or_else(|| {
        ShelfError::invalid_value("subject", term, "expected <kind>:<id or title>")
    })?;
    match kind.trim().to_lowercase().as_str() {
        "book" => Ok(get::by_term::<Book>(catalog, rest)?.subject()),
        "edition" => Ok(get::by_term::<Edition>(catalog, rest)?.subject()),
        "issue" => Ok(get::by_term::<Issue>(catalog, rest)?.subject()),
        "magazine" => Ok(get::by_term::<Magazine>(catalog, rest)?.subject()),
        "paper" => Ok(get::by_term::<Paper>(catalog, rest)?.subject()),
        _ => Err(ShelfError::invalid_value(
            "subject",
            term,
            "kind must be one of book, edition, issue, magazine, paper",
        )),
    }
}

pub fn add_acquisition<S: DataStore>(
    store: &mut S,
    subject: &str,
    date: &str,
    price: &str,
) -> Result<Acquisition> {
    let date = parse_date("date", date)?;
    let price = parse_number("price", price)?;
    store.write(|catalog| {
        let subject = resolve_subject(catalog, subject)?;
        catalog.insert(Acquisition {
            meta: Meta::new(),
            subject,
            date,
            price,
        })
    })
}

pub fn add_read<S: DataStore>(
    store: &mut S,
    subject: &str,
    started: &str,
    finished: &str,
) -> Result<Read> {
    let started = parse_date("started", started)?;
    let finished = parse_date("finished", finished)?;
    store.write(|catalog| {
        let subject = resolve_subject(catalog, subject)?;
        catalog.insert(Read {
            meta: Meta::new(),
            subject,
            started,
            finished,
        })
    })
}

/// Blob name for an attached file: random, keeping the original extension.
fn blob_name(name: &str) -> String {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    format!("{}{}", Uuid::new_v4(), ext)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| ShelfError::invalid_value("path", path.display().to_string(), "not a file"))
}

/// Deletes a blob no record points at any more. Failure is only a warning.
pub(crate) fn discard_blob<S: DataStore>(store: &mut S, blob: &str) -> Option<CmdMessage> {
    match store.delete_blob(blob) {
        Ok(()) => None,
        Err(e) => {
            warn!(blob = %blob, error = %e, "could not delete blob");
            Some(CmdMessage::warning(format!(
                "Could not delete stored blob {}: {}",
                blob, e
            )))
        }
    }
}

/// Stores `bytes` and records them as a file of `subject`.
pub fn attach_bytes<S: DataStore>(
    store: &mut S,
    subject: &str,
    name: &str,
    bytes: &[u8],
) -> Result<File> {
    let name = required_text("name", name)?;
    let subject = store.read(|catalog| resolve_subject(catalog, subject))?;
    let blob = blob_name(&name);
    store.put_blob(&blob, bytes)?;

    let inserted = store.write(|catalog| {
        if !catalog.subject_exists(subject) {
            return Err(ShelfError::not_found(subject.kind(), subject.to_string()));
        }
        catalog.insert(File {
            meta: Meta::new(),
            subject,
            name,
            blob: blob.clone(),
        })
    });

    match inserted {
        Ok(file) => {
            debug!(file = %file.meta.id, blob = %file.blob, "file attached");
            Ok(file)
        }
        Err(e) => {
            discard_blob(store, &blob);
            Err(e)
        }
    }
}

/// Copies the file at `path` into the blob store.
pub fn attach_file<S: DataStore>(store: &mut S, subject: &str, path: &Path) -> Result<File> {
    let bytes = fs::read(path).map_err(ShelfError::Io)?;
    let name = file_name(path)?;
    attach_bytes(store, subject, &name, &bytes)
}

/// The file record and its bytes.
pub fn open<S: DataStore>(store: &S, term: &str) -> Result<(File, Vec<u8>)> {
    let file = get::run::<_, File>(store, term)?;
    let bytes = store.get_blob(&file.blob)?;
    Ok((file, bytes))
}

pub fn path<S: DataStore>(store: &S, term: &str) -> Result<PathBuf> {
    let file = get::run::<_, File>(store, term)?;
    Ok(store.blob_path(&file.blob))
}

/// Copies a cover image into the blob store and returns its blob name.
pub(crate) fn store_cover<S: DataStore>(store: &mut S, path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(ShelfError::Io)?;
    let blob = blob_name(&file_name(path)?);
    store.put_blob(&blob, &bytes)?;
    debug!(blob = %blob, "cover stored");
    Ok(blob)
}

/// Replaces the cover of an issue, or clears it when `path` is `None`.
///
/// The new image is stored before the catalog changes and removed again if
/// the change fails. The previous image is deleted once the change is saved.
pub fn set_cover<S: DataStore>(
    store: &mut S,
    term: &str,
    path: Option<&Path>,
) -> Result<CmdResult<Issue>> {
    let blob = match path {
        Some(path) => Some(store_cover(store, path)?),
        None => None,
    };
    let updated = store.write(|catalog| {
        let mut issue = get::by_term::<Issue>(catalog, term)?;
        let previous = std::mem::replace(&mut issue.cover, blob.clone());
        let saved = catalog.update(issue)?;
        Ok((saved, previous))
    });
    let (issue, previous) = match updated {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(blob) = &blob {
                discard_blob(store, blob);
            }
            return Err(e);
        }
    };

    let verb = if issue.cover.is_some() { "Set" } else { "Cleared" };
    let mut result = CmdResult::new(issue);
    result.add_message(CmdMessage::success(format!(
        "{} cover of issue {}",
        verb, result.value.meta.id
    )));
    if let Some(warning) = previous.and_then(|old| discard_blob(store, &old)) {
        result.add_message(warning);
    }
    Ok(result)
}

pub fn cover_path<S: DataStore>(store: &S, term: &str) -> Result<PathBuf> {
    let issue = get::run::<_, Issue>(store, term)?;
    let blob = issue
        .cover
        .ok_or_else(|| ShelfError::not_found("cover", term.to_string()))?;
    Ok(store.blob_path(&blob))
}

/// Everything attached to one subject.
#[derive(Debug, Clone)]
pub struct Status {
    pub subject: Subject,
    pub label: String,
    pub reading: ReadingStatus,
    pub acquisitions: Vec<Acquisition>,
    pub reads: Vec<Read>,
    pub files: Vec<File>,
}

pub fn status<S: DataStore>(store: &S, subject: &str) -> Result<Status> {
    store.read(|catalog| {
        let subject = resolve_subject(catalog, subject)?;
        let reads = catalog.reads_of(subject);
        Ok(Status {
            subject,
            label: catalog.describe(subject)?,
            reading: ReadingStatus::of(&reads),
            acquisitions: catalog.acquisitions_of(subject),
            reads,
            files: catalog.files_of(subject),
        })
    })
}
