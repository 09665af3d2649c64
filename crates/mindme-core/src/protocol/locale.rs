//! Speech locale (language plus optional country).

use std::fmt;

const SEPARATORS: [char; 2] = ['_', '-'];

/// Language to speak a status in.
///
/// Language codes are stored lowercase and country codes uppercase, so
/// `Locale::new("EN", Some("us"))` equals `Locale::new("en", Some("US"))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    /// Build a locale. An empty country is treated as absent.
    ///
    /// Returns `None` when the language is empty or contains a `_` or `-`
    /// separator.
    pub fn new(language: &str, country: Option<&str>) -> Option<Self> {
        let language = language.trim();
        if language.is_empty() || language.contains(SEPARATORS) {
            return None;
        }
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_ascii_uppercase);
        Some(Self {
            language: language.to_ascii_lowercase(),
            country,
        })
    }

    /// Language-only locale.
    pub fn language_only(language: &str) -> Option<Self> {
        Self::new(language, None)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Parse `ll`, `ll_CC` or `ll-CC`. Returns `None` for an empty tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().split_once(SEPARATORS) {
            Some((lang, country)) => Self::new(lang, Some(country)),
            None => Self::language_only(tag),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(c) => write!(f, "{}_{}", self.language, c),
            None => f.write_str(&self.language),
        }
    }
}
