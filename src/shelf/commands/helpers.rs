use crate::error::{Result, ShelfError};
use crate::model::*;
use crate::slug::derive_slug;
use crate::store::{Catalog, Record};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `first_name` and `first-name` name the same field.
pub fn normalize_field(field: &str) -> String {
    field.trim().to_lowercase().replace('_', "-")
}

pub fn required_text(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ShelfError::invalid_value(field, value, "must not be empty"));
    }
    if value.contains('\n') {
        return Err(ShelfError::invalid_value(
            field,
            value,
            "must be a single line",
        ));
    }
    Ok(value.to_string())
}

/// Empty input clears an optional field.
pub fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn parse_date(field: &str, value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ShelfError::invalid_value(field, value, "expected a date like 2024-03-31"))
}

pub fn parse_number(field: &str, value: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.replace(',', ".").parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(Some(n)),
        _ => Err(ShelfError::invalid_value(
            field,
            value,
            "expected a non-negative number",
        )),
    }
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn format_number(n: Option<f64>) -> String {
    match n {
        Some(n) if n.fract() == 0.0 => format!("{}", n as i64),
        Some(n) => format!("{}", n),
        None => String::new(),
    }
}

pub fn format_price(price: Option<f64>) -> String {
    price.map(|p| format!("{:.2}", p)).unwrap_or_default()
}

pub fn push_unique<T: PartialEq>(ids: &mut Vec<T>, id: T) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Existing named record whose name or slug matches `name`, else a new one.
pub fn named_for<R: Record + Named>(catalog: &mut Catalog, name: &str) -> Result<R::Id> {
    let name = required_text(R::KIND, name)?;
    let slug = derive_slug(&name);
    let existing = R::table(catalog)
        .iter()
        .find(|r| r.name() == name || (!slug.is_empty() && r.slug() == slug))
        .map(|r| r.id());
    match existing {
        Some(id) => Ok(id),
        None => Ok(catalog.insert(R::with_name(name))?.id()),
    }
}

/// The last word is the last name, everything before it the first name.
pub fn split_name(full: &str) -> (String, Option<String>) {
    let full = full.trim();
    match full.rsplit_once(char::is_whitespace) {
        Some((first, last)) => (first.trim().to_string(), Some(last.to_string())),
        None => (full.to_string(), None),
    }
}

/// Person matching `name` by id, slug or full name, created when missing.
pub fn person_for(catalog: &mut Catalog, name: &str) -> Result<PersonId> {
    let name = required_text("person", name)?;
    if let Ok(id) = name.parse::<u64>() {
        if catalog.persons.contains(PersonId(id)) {
            return Ok(PersonId(id));
        }
    }
    let slug = derive_slug(&name);
    let lowered = name.to_lowercase();
    let existing = catalog
        .persons
        .iter()
        .find(|p| (!slug.is_empty() && p.slug == slug) || p.full_name().to_lowercase() == lowered)
        .map(|p| p.meta.id);
    if let Some(id) = existing {
        return Ok(id);
    }
    let (first_name, last_name) = split_name(&name);
    let person = Person {
        meta: Meta::new(),
        slug: String::new(),
        first_name,
        last_name,
        links: vec![],
    };
    Ok(catalog.insert(person)?.meta.id)
}

/// Records owning a list of shared links.
pub trait HasLinks {
    fn links(&self) -> &[LinkId];
    fn links_mut(&mut self) -> &mut Vec<LinkId>;
}

macro_rules! has_links {
    ($($ty:ty),*) => {
        $(impl HasLinks for $ty {
            fn links(&self) -> &[LinkId] {
                &self.links
            }
            fn links_mut(&mut self) -> &mut Vec<LinkId> {
                &mut self.links
            }
        })*
    };
}

has_links!(Publisher, Series, Journal, Magazine, Issue, Person, Book, Edition, Paper);

/// Records with a list of languages.
pub trait HasLanguages {
    fn languages_mut(&mut self) -> &mut Vec<LanguageId>;
}

macro_rules! has_languages {
    ($($ty:ty),*) => {
        $(impl HasLanguages for $ty {
            fn languages_mut(&mut self) -> &mut Vec<LanguageId> {
                &mut self.languages
            }
        })*
    };
}

has_languages!(Issue, Edition, Paper);

pub fn add_link<T: HasLinks>(catalog: &mut Catalog, record: &mut T, url: &str) -> Result<()> {
    let url = required_text("link", url)?;
    let id = catalog.link_for(&url)?;
    push_unique(record.links_mut(), id);
    Ok(())
}

/// Removing a link the record does not have is not an error.
pub fn remove_link<T: HasLinks>(catalog: &Catalog, record: &mut T, url: &str) -> Result<()> {
    let url = url.trim();
    let id = catalog
        .links
        .iter()
        .find(|l| l.url == url || l.meta.id.to_string() == url)
        .map(|l| l.meta.id)
        .ok_or_else(|| ShelfError::not_found("link", url))?;
    record.links_mut().retain(|l| *l != id);
    Ok(())
}

pub fn add_language<T: HasLanguages>(
    catalog: &mut Catalog,
    record: &mut T,
    name: &str,
) -> Result<()> {
    let id = named_for::<Language>(catalog, name)?;
    push_unique(record.languages_mut(), id);
    Ok(())
}

pub fn remove_language<T: HasLanguages>(
    catalog: &Catalog,
    record: &mut T,
    name: &str,
) -> Result<()> {
    let slug = derive_slug(name);
    let id = catalog
        .languages
        .iter()
        .find(|l| l.name == name.trim() || l.slug == slug || l.code.as_deref() == Some(name.trim()))
        .map(|l| l.meta.id)
        .ok_or_else(|| ShelfError::not_found("language", name))?;
    record.languages_mut().retain(|l| *l != id);
    Ok(())
}
