//! The flat wire form: an ordered multimap of string keys to string values.
//!
//! A [`WireCollection`] is the serialized shape every conversion produces
//! or consumes. Keys are not unique: a key may carry zero, one, or many
//! values, and insertion order is preserved both per key and across the
//! whole collection. This mirrors the classic name/value collections used
//! by form-encoded protocols.

use std::collections::HashSet;

/// An ordered sequence of `(key, value)` string pairs where a key may
/// repeat.
///
/// Writes are always additive: appending never disturbs entries already
/// present, which is what lets the save engine merge nested objects into
/// one collection without overwriting earlier fields.
///
/// ## Examples
///
/// ```rust
/// use wiremap::WireCollection;
///
/// let mut wire = WireCollection::new();
/// wire.append("L_NAME0", "first");
/// wire.append("L_NAME1", "second");
/// wire.append("L_NAME0", "shadowed? no — multivalued");
///
/// assert_eq!(wire.get("L_NAME0"), Some("first"));
/// assert_eq!(wire.get_values("L_NAME0").count(), 2);
/// assert_eq!(wire.all_keys().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WireCollection {
    entries: Vec<(String, String)>,
}

impl WireCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends one `(key, value)` occurrence.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Number of `(key, value)` occurrences (not distinct keys).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the collection holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first value recorded for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any occurrence of `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Every value recorded for `key`, in insertion order.
    pub fn get_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Each distinct key once, in order of first appearance.
    pub fn all_keys(&self) -> impl Iterator<Item = &str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(move |(k, _)| seen.insert(k.as_str()))
            .map(|(k, _)| k.as_str())
    }

    /// Every `(key, value)` occurrence, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Appends every occurrence from `other`, preserving its order.
    ///
    /// Entries already present are left untouched; copies are additive.
    pub fn merge_from(&mut self, other: &WireCollection) {
        self.entries
            .extend(other.entries.iter().cloned());
    }
}

impl FromIterator<(String, String)> for WireCollection {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a WireCollection {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(feature = "query")]
impl WireCollection {
    /// Flattens the collection into an `application/x-www-form-urlencoded`
    /// query string, preserving entry order.
    ///
    /// Only the textual encoding is provided; transporting the string is
    /// the caller's concern.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&urlencoding::encode(key));
            out.push('=');
            out.push_str(&urlencoding::encode(value));
        }
        out
    }

    /// Parses an `application/x-www-form-urlencoded` query string into a
    /// collection, preserving pair order. A pair without `=` becomes a key
    /// with an empty value; empty segments are skipped.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let mut wire = Self::new();
        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k, v),
                None => (pair, ""),
            };
            let key = urlencoding::decode(key).map_or_else(|_| key.to_string(), |c| c.into_owned());
            let value =
                urlencoding::decode(value).map_or_else(|_| value.to_string(), |c| c.into_owned());
            wire.append(key, value);
        }
        wire
    }
}
