//! URL-safe identifiers derived from display names.
//!
//! Records that carry a slug implement [`Sluggable`]; the store calls
//! [`assign`] on every save, which only recomputes the slug when there is none
//! yet or when the name it derives from changed.

/// Lowercase, hyphen-separated form of `name`.
///
/// Latin letters with diacritics are folded to their base letters, letters and
/// digits of other scripts are kept as they are, every run of other characters
/// becomes a single `-`, and there are no leading or trailing hyphens.
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let folded = if c.is_ascii_alphanumeric() {
            None
        } else {
            match fold(c) {
                Some(ascii) => Some(ascii),
                None if c.is_alphanumeric() => None,
                None => {
                    pending_dash = !slug.is_empty();
                    continue;
                }
            }
        };
        if pending_dash {
            slug.push('-');
            pending_dash = false;
        }
        match folded {
            Some(ascii) => slug.push_str(ascii),
            None => slug.push(c),
        }
    }

    slug
}

/// ASCII replacement for a lowercase Latin letter, `None` when there is none.
fn fold(c: char) -> Option<&'static str> {
    let ascii = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => "i",
        'ł' | 'ľ' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(ascii)
}

/// A record whose slug follows one of its text fields.
pub trait Sluggable {
    /// The text the slug is derived from.
    fn slug_source(&self) -> String;
    fn slug(&self) -> &str;
    fn set_slug(&mut self, slug: String);
}

/// Save-time slug policy.
///
/// `previous` is the stored version of the record, `None` on first insert.
pub fn assign<T: Sluggable>(record: &mut T, previous: Option<&T>) {
    let stale = record.slug().is_empty()
        || previous.is_some_and(|prev| prev.slug_source() != record.slug_source());
    if stale {
        record.set_slug(derive_slug(&record.slug_source()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        name: String,
        slug: String,
    }

    impl Named {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                slug: String::new(),
            }
        }
    }

    impl Sluggable for Named {
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

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(derive_slug("Science Fiction"), "science-fiction");
        assert_eq!(derive_slug("  The  Left Hand of   Darkness "), "the-left-hand-of-darkness");
    }

    #[test]
    fn collapses_punctuation() {
        assert_eq!(derive_slug("Dune: Messiah!"), "dune-messiah");
        assert_eq!(derive_slug("C++ / Rust -- 2nd ed."), "c-rust-2nd-ed");
        assert_eq!(derive_slug("O'Brien"), "o-brien");
    }

    #[test]
    fn folds_diacritics() {
        assert_eq!(derive_slug("Gödel, Escher, Bach"), "godel-escher-bach");
        assert_eq!(derive_slug("Straße"), "strasse");
        assert_eq!(derive_slug("Ærø"), "aero");
    }

    #[test]
    fn keeps_other_scripts() {
        assert_eq!(derive_slug("日本文学"), "日本文学");
        assert_ne!(derive_slug("日本文学"), derive_slug("中国文学"));
        assert_eq!(derive_slug("Мастер и Маргарита"), "мастер-и-маргарита");
        assert_eq!(derive_slug("Οδύσσεια"), "οδύσσεια");
    }

    #[test]
    fn nothing_sluggable_gives_empty() {
        assert_eq!(derive_slug(""), "");
        assert_eq!(derive_slug("!!! ???"), "");
    }

    #[test]
    fn first_save_computes_slug() {
        let mut g = Named::new("Hard SF");
        assign(&mut g, None);
        assert_eq!(g.slug, "hard-sf");
    }

    #[test]
    fn unchanged_name_keeps_slug() {
        let mut stored = Named::new("Hard SF");
        stored.slug = "custom".into();
        let mut again = Named::new("Hard SF");
        again.slug = "custom".into();
        assign(&mut again, Some(&stored));
        assert_eq!(again.slug, "custom");
    }

    #[test]
    fn renamed_record_gets_new_slug() {
        let mut stored = Named::new("Hard SF");
        assign(&mut stored, None);
        let mut renamed = Named::new("Space Opera");
        renamed.slug = stored.slug.clone();
        assign(&mut renamed, Some(&stored));
        assert_eq!(renamed.slug, "space-opera");
    }
}
