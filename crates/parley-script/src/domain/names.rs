//! Narrator names and `{Key}` placeholder substitution.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern is valid"));

/// Mutable key → display name table.
///
/// Lookups always see the latest registration, so a key registered
/// mid-script affects every node displayed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    names: HashMap<String, String>,
}

impl NameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from key/name pairs.
    #[must_use]
    pub fn with_names<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Registers or replaces the name for `key`.
    pub fn register(&mut self, key: impl Into<String>, name: impl Into<String>) {
        self.names.insert(key.into(), name.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Display name for `key`, or the key itself when unregistered.
    #[must_use]
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    /// Replaces every `{Key}` in `text` with its registered name. Unknown
    /// keys are left verbatim.
    #[must_use]
    pub fn substitute<'t>(&self, text: &'t str) -> Cow<'t, str> {
        PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
            self.get(&caps[1])
                .map_or_else(|| caps[0].to_owned(), str::to_owned)
        })
    }
}
