//! Locale identifiers and best-match selection over locale-keyed maps.

use std::collections::BTreeMap;
use std::fmt;

use icu_locale_core::LanguageIdentifier;
use serde::{Deserialize, Serialize};

use crate::message::ConfigError;

/// A language with an optional region.
///
/// The root locale has an empty language and no region; it orders before
/// every other locale, so it is the first key of any map that contains it.
/// A region without a language (`und-US`) is kept and displayed as such.
///
/// # Example
///
/// ```
/// use msgfmt::Locale;
///
/// let locale = Locale::parse("en_US").unwrap();
/// assert_eq!(locale.language(), "en");
/// assert_eq!(locale.region(), Some("US"));
/// assert_eq!(locale.to_string(), "en-US");
/// assert!(Locale::parse("und").unwrap().is_root());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// The root (language neutral) locale.
    pub fn root() -> Self {
        Self::default()
    }

    /// A language-only locale such as `en`; `und` gives the root locale.
    ///
    /// The language is validated and normalized like [`Locale::parse`];
    /// tags carrying a region are rejected.
    pub fn language_only(language: &str) -> Result<Self, ConfigError> {
        let locale = Self::parse(language)?;
        if locale.region.is_some() {
            return Err(ConfigError::InvalidLocale {
                tag: language.to_string(),
            });
        }
        Ok(locale)
    }

    /// Parse a tag such as `en`, `en-US` or `en_US`.
    ///
    /// The empty string, `und` and `root` parse to the root locale.
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        let tag = tag.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("und") || tag.eq_ignore_ascii_case("root") {
            return Ok(Self::root());
        }

        let normalized = tag.replace('_', "-");
        let id = LanguageIdentifier::try_from_str(&normalized).map_err(|_| {
            ConfigError::InvalidLocale {
                tag: tag.to_string(),
            }
        })?;

        let language = id.language.as_str();
        Ok(Locale {
            language: if language == "und" {
                String::new()
            } else {
                language.to_string()
            },
            region: id.region.map(|region| region.as_str().to_string()),
        })
    }

    /// The language subtag, empty for the root locale.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The region subtag, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Whether this is the root locale.
    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.region.is_none()
    }

    /// This locale without its region.
    pub fn without_region(&self) -> Self {
        Locale {
            language: self.language.clone(),
            region: None,
        }
    }

    /// Pick the entry of `entries` that best serves `requested`.
    ///
    /// Priority: the exact locale, the language-only entry, any entry of
    /// the same language, the root entry, and finally the first entry.
    /// Returns `None` only for an empty map.
    pub fn select<'a, V>(
        requested: &Locale,
        entries: &'a BTreeMap<Locale, V>,
    ) -> Option<(&'a Locale, &'a V)> {
        if let Some(hit) = entries.get_key_value(requested) {
            return Some(hit);
        }
        if !requested.language.is_empty() {
            if let Some(hit) = entries.get_key_value(&requested.without_region()) {
                return Some(hit);
            }
            if let Some(hit) = entries
                .iter()
                .find(|(locale, _)| locale.language == requested.language)
            {
                return Some(hit);
            }
        }
        entries
            .get_key_value(&Locale::root())
            .or_else(|| entries.iter().next())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.language.is_empty() {
            f.write_str("und")?;
        } else {
            f.write_str(&self.language)?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{region}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Locale {
    type Error = ConfigError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        Locale::parse(&tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}
