//! Localized text as the commerce API exchanges it.
//!
//! The API returns localized values as a list of `{ locale, value }` pairs
//! while forms edit them as a locale -> value map. [`LocalizedString`] is the
//! canonical in-memory shape used by the normalizer and the action synthesizer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// A single `{ locale, value }` entry as returned by `*AllLocales` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedField {
    pub locale: String,
    pub value: String,
}

impl LocalizedField {
    pub fn new(locale: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            value: value.into(),
        }
    }
}

/// Locale -> value mapping that never stores a blank value.
///
/// Inserting a blank (empty or whitespace-only) value removes the locale, so a
/// value of `""` for `en` and a missing `en` compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocalizedString(BTreeMap<String, String>);

impl LocalizedString {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build from the API's list representation, dropping blank values.
    pub fn from_fields(fields: &[LocalizedField]) -> Self {
        fields
            .iter()
            .map(|f| (f.locale.clone(), f.value.clone()))
            .collect()
    }

    /// Convert back into the list representation used for submission.
    pub fn to_fields(&self) -> Vec<LocalizedField> {
        self.0
            .iter()
            .map(|(locale, value)| LocalizedField::new(locale.clone(), value.clone()))
            .collect()
    }

    pub fn with(mut self, locale: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(locale, value);
        self
    }

    /// Set the value for `locale`; a blank value clears it instead.
    pub fn insert(&mut self, locale: impl Into<String>, value: impl Into<String>) {
        let locale = locale.into();
        let value = value.into();
        if is_blank(&value) {
            self.0.remove(&locale);
        } else {
            self.0.insert(locale, value);
        }
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pick a display value: the requested locale first, then the first
    /// locale in alphabetical order.
    pub fn localize(&self, locale: &str) -> Option<&str> {
        self.get(locale)
            .or_else(|| self.0.values().next().map(String::as_str))
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedString {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut localized = LocalizedString::new();
        for (locale, value) in iter {
            localized.insert(locale, value);
        }
        localized
    }
}

impl From<&[LocalizedField]> for LocalizedString {
    fn from(fields: &[LocalizedField]) -> Self {
        Self::from_fields(fields)
    }
}

impl From<&BTreeMap<String, String>> for LocalizedString {
    fn from(map: &BTreeMap<String, String>) -> Self {
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

// Serialized as the list shape expected by `LocalizedStringItemInputType`.
impl Serialize for LocalizedString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_fields().serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocalizedRepr {
    List(Vec<LocalizedField>),
    Map(BTreeMap<String, String>),
}

impl<'de> Deserialize<'de> for LocalizedString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match LocalizedRepr::deserialize(deserializer)? {
            LocalizedRepr::List(fields) => LocalizedString::from_fields(&fields),
            LocalizedRepr::Map(map) => LocalizedString::from(&map),
        })
    }
}
