//! Field-by-field editing.
//!
//! Each entity has its own field enum; a field name that is not in the enum is
//! rejected with `InvalidField` before the store is touched. The lookup, the
//! change and any related records it creates share one transaction.

use super::get::{self, Lookup};
use super::helpers::{
    add_language, add_link, named_for, normalize_field, optional_text, parse_date, parse_number,
    person_for, push_unique, remove_language, remove_link, required_text,
};
use super::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfError};
use crate::model::*;
use crate::store::{Catalog, DataStore, Record};
use std::fmt;

/// The editable fields of one entity.
pub trait FieldName: Copy + fmt::Display + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Accepts `-` or `_` as word separator, case-insensitive.
    fn parse(name: &str) -> Option<Self> {
        let name = normalize_field(name);
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

macro_rules! fields {
    ($name:ident { $($variant:ident => $text:literal),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),*
        }

        impl FieldName for $name {
            const ALL: &'static [Self] = &[$($name::$variant),*];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

fields!(GenreField { Name => "name" });
fields!(LanguageField { Name => "name", Code => "code" });
fields!(LinkedNameField {
    Name => "name",
    AddLink => "add-link",
    RemoveLink => "remove-link",
});
fields!(MagazineField {
    Name => "name",
    Feed => "feed",
    AddLink => "add-link",
    RemoveLink => "remove-link",
});
fields!(PersonField {
    FirstName => "first-name",
    LastName => "last-name",
    AddLink => "add-link",
    RemoveLink => "remove-link",
});
fields!(BookField {
    Title => "title",
    Series => "series",
    Volume => "volume",
    AddAuthor => "add-author",
    RemoveAuthor => "remove-author",
    AddGenre => "add-genre",
    RemoveGenre => "remove-genre",
    AddLink => "add-link",
    RemoveLink => "remove-link",
});
fields!(EditionField {
    AlternateTitle => "alternate-title",
    Isbn => "isbn",
    PublishingDate => "publishing-date",
    Publisher => "publisher",
    Binding => "binding",
    AddLanguage => "add-language",
    RemoveLanguage => "remove-language",
    AddLink => "add-link",
    RemoveLink => "remove-link",
});
fields!(IssueField {
    Issue => "issue",
    PublishingDate => "publishing-date",
    AddLanguage => "add-language",
    RemoveLanguage => "remove-language",
    AddLink => "add-link",
    RemoveLink => "remove-link",
});
fields!(PaperField {
    Title => "title",
    Journal => "journal",
    Volume => "volume",
    PublishingDate => "publishing-date",
    AddAuthor => "add-author",
    RemoveAuthor => "remove-author",
    AddLanguage => "add-language",
    RemoveLanguage => "remove-language",
    AddLink => "add-link",
    RemoveLink => "remove-link",
});
fields!(LinkField { Url => "url" });
fields!(AcquisitionField { Date => "date", Price => "price" });
fields!(ReadField { Started => "started", Finished => "finished" });

/// A record whose fields can be changed one at a time.
pub trait Editable: Lookup {
    type Field: FieldName;

    /// Applies `value` to `field`. May create related records in `catalog`.
    fn apply(&mut self, field: Self::Field, value: &str, catalog: &mut Catalog) -> Result<()>;
}

pub fn parse_field<R: Editable>(field: &str) -> Result<R::Field> {
    R::Field::parse(field).ok_or_else(|| ShelfError::InvalidField {
        kind: R::KIND,
        field: field.trim().to_string(),
    })
}

pub fn run<S: DataStore, R: Editable>(
    store: &mut S,
    term: &str,
    field: &str,
    value: &str,
) -> Result<CmdResult<R>> {
    let field = parse_field::<R>(field)?;
    let (record, label) = store.write(|catalog| {
        let mut record = get::by_term::<R>(catalog, term)?;
        record.apply(field, value, catalog)?;
        let saved = catalog.update(record)?;
        let label = saved.label(catalog);
        Ok((saved, label))
    })?;

    let message = CmdMessage::success(format!(
        "Updated {} of {} {}: {}",
        field,
        R::KIND,
        record.id(),
        label
    ));
    Ok(CmdResult::new(record).with_message(message))
}

fn set_name<R: Named>(record: &mut R, kind: &str, value: &str) -> Result<()> {
    record.set_name(required_text(kind, value)?);
    Ok(())
}

fn optional_named<R: Record + Named>(catalog: &mut Catalog, value: &str) -> Result<Option<R::Id>> {
    match optional_text(value) {
        Some(name) => named_for::<R>(catalog, &name).map(Some),
        None => Ok(None),
    }
}

fn remove_person(catalog: &Catalog, authors: &mut Vec<PersonId>, term: &str) -> Result<()> {
    let person = get::by_term::<Person>(catalog, term)?;
    authors.retain(|id| *id != person.id());
    Ok(())
}

impl Editable for Genre {
    type Field = GenreField;

    fn apply(&mut self, field: GenreField, value: &str, _catalog: &mut Catalog) -> Result<()> {
        match field {
            GenreField::Name => set_name(self, "name", value),
        }
    }
}

impl Editable for Language {
    type Field = LanguageField;

    fn apply(&mut self, field: LanguageField, value: &str, _catalog: &mut Catalog) -> Result<()> {
        match field {
            LanguageField::Name => set_name(self, "name", value)?,
            LanguageField::Code => self.code = optional_text(value),
        }
        Ok(())
    }
}

macro_rules! linked_name_editable {
    ($($ty:ty),*) => {
        $(impl Editable for $ty {
            type Field = LinkedNameField;

            fn apply(&mut self, field: LinkedNameField, value: &str, catalog: &mut Catalog) -> Result<()> {
                match field {
                    LinkedNameField::Name => set_name(self, "name", value),
                    LinkedNameField::AddLink => add_link(catalog, self, value),
                    LinkedNameField::RemoveLink => remove_link(catalog, self, value),
                }
            }
        })*
    };
}

linked_name_editable!(Publisher, Series, Journal);

impl Editable for Magazine {
    type Field = MagazineField;

    fn apply(&mut self, field: MagazineField, value: &str, catalog: &mut Catalog) -> Result<()> {
        match field {
            MagazineField::Name => set_name(self, "name", value)?,
            MagazineField::Feed => {
                self.feed = match optional_text(value) {
                    Some(url) => Some(catalog.link_for(&url)?),
                    None => None,
                }
            }
            MagazineField::AddLink => add_link(catalog, self, value)?,
            MagazineField::RemoveLink => remove_link(catalog, self, value)?,
        }
        Ok(())
    }
}

impl Editable for Person {
    type Field = PersonField;

    fn apply(&mut self, field: PersonField, value: &str, catalog: &mut Catalog) -> Result<()> {
        match field {
            PersonField::FirstName => self.first_name = required_text("first-name", value)?,
            PersonField::LastName => self.last_name = optional_text(value),
            PersonField::AddLink => add_link(catalog, self, value)?,
            PersonField::RemoveLink => remove_link(catalog, self, value)?,
        }
        Ok(())
    }
}

impl Editable for Book {
    type Field = BookField;

    fn apply(&mut self, field: BookField, value: &str, catalog: &mut Catalog) -> Result<()> {
        match field {
            BookField::Title => self.title = required_text("title", value)?,
            BookField::Series => self.series = optional_named::<Series>(catalog, value)?,
            BookField::Volume => self.volume = parse_number("volume", value)?,
            BookField::AddAuthor => push_unique(&mut self.authors, person_for(catalog, value)?),
            BookField::RemoveAuthor => remove_person(catalog, &mut self.authors, value)?,
            BookField::AddGenre => push_unique(&mut self.genres, named_for::<Genre>(catalog, value)?),
            BookField::RemoveGenre => {
                let genre = get::by_term::<Genre>(catalog, value)?;
                self.genres.retain(|id| *id != genre.id());
            }
            BookField::AddLink => add_link(catalog, self, value)?,
            BookField::RemoveLink => remove_link(catalog, self, value)?,
        }
        Ok(())
    }
}

impl Editable for Edition {
    type Field = EditionField;

    fn apply(&mut self, field: EditionField, value: &str, catalog: &mut Catalog) -> Result<()> {
        match field {
            EditionField::AlternateTitle => self.alternate_title = optional_text(value),
            EditionField::Isbn => self.isbn = optional_text(value),
            EditionField::PublishingDate => {
                self.publishing_date = parse_date("publishing-date", value)?
            }
            EditionField::Publisher => {
                self.publisher = optional_named::<Publisher>(catalog, value)?
            }
            EditionField::Binding => self.binding = optional_text(value),
            EditionField::AddLanguage => add_language(catalog, self, value)?,
            EditionField::RemoveLanguage => remove_language(catalog, self, value)?,
            EditionField::AddLink => add_link(catalog, self, value)?,
            EditionField::RemoveLink => remove_link(catalog, self, value)?,
        }
        Ok(())
    }
}

impl Editable for Issue {
    type Field = IssueField;

    fn apply(&mut self, field: IssueField, value: &str, catalog: &mut Catalog) -> Result<()> {
        match field {
            IssueField::Issue => self.issue = required_text("issue", value)?,
            IssueField::PublishingDate => {
                self.publishing_date = parse_date("publishing-date", value)?
            }
            IssueField::AddLanguage => add_language(catalog, self, value)?,
            IssueField::RemoveLanguage => remove_language(catalog, self, value)?,
            IssueField::AddLink => add_link(catalog, self, value)?,
            IssueField::RemoveLink => remove_link(catalog, self, value)?,
        }
        Ok(())
    }
}

impl Editable for Paper {
    type Field = PaperField;

    fn apply(&mut self, field: PaperField, value: &str, catalog: &mut Catalog) -> Result<()> {
        match field {
            PaperField::Title => self.title = required_text("title", value)?,
            PaperField::Journal => self.journal = optional_named::<Journal>(catalog, value)?,
            PaperField::Volume => self.volume = optional_text(value),
            PaperField::PublishingDate => {
                self.publishing_date = parse_date("publishing-date", value)?
            }
            PaperField::AddAuthor => push_unique(&mut self.authors, person_for(catalog, value)?),
            PaperField::RemoveAuthor => remove_person(catalog, &mut self.authors, value)?,
            PaperField::AddLanguage => add_language(catalog, self, value)?,
            PaperField::RemoveLanguage => remove_language(catalog, self, value)?,
            PaperField::AddLink => add_link(catalog, self, value)?,
            PaperField::RemoveLink => remove_link(catalog, self, value)?,
        }
        Ok(())
    }
}

impl Editable for Link {
    type Field = LinkField;

    fn apply(&mut self, field: LinkField, value: &str, _catalog: &mut Catalog) -> Result<()> {
        match field {
            LinkField::Url => self.url = required_text("url", value)?,
        }
        Ok(())
    }
}

impl Editable for Acquisition {
    type Field = AcquisitionField;

    fn apply(&mut self, field: AcquisitionField, value: &str, _catalog: &mut Catalog) -> Result<()> {
        match field {
            AcquisitionField::Date => self.date = parse_date("date", value)?,
            AcquisitionField::Price => self.price = parse_number("price", value)?,
        }
        Ok(())
    }
}

impl Editable for Read {
    type Field = ReadField;

    fn apply(&mut self, field: ReadField, value: &str, _catalog: &mut Catalog) -> Result<()> {
        match field {
            ReadField::Started => self.started = parse_date("started", value)?,
            ReadField::Finished => self.finished = parse_date("finished", value)?,
        }
        Ok(())
    }
}
