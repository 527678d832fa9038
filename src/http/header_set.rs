//! Case-insensitive, order-preserving header mapping.
//!
//! Upstream headers are kept in arrival order. Names coming from a
//! `HeaderMap` are already lowercased by the HTTP stack; names added through
//! `append` or `insert` keep the case given. Every lookup compares names
//! ASCII case-insensitively. Names the
//! caller supplies need not be valid HTTP header names: an invalid name simply
//! never matches.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, HeaderValue)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_header_map(map: &HeaderMap) -> Self {
        let entries = map
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.clone()))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// First value for `name`, lossily decoded as text.
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| String::from_utf8_lossy(v.as_bytes()).into_owned())
    }

    /// Append a value, keeping any existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: HeaderValue) {
        self.entries.push((name.into(), value));
    }

    /// Replace every value of `name` with a single value.
    pub fn insert(&mut self, name: impl Into<String>, value: HeaderValue) {
        let name = name.into();
        self.remove(&name);
        self.entries.push((name, value));
    }

    /// Remove every value of `name`. Returns how many entries were dropped.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Convert back into a `HeaderMap`, skipping names that cannot be encoded.
    pub fn into_header_map(self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in self.entries {
            match HeaderName::from_bytes(name.as_bytes()) {
                Ok(name) => {
                    map.append(name, value);
                }
                Err(_) => {
                    tracing::debug!(header = %name, "Dropping header with invalid name");
                }
            }
        }
        map
    }
}

impl From<&HeaderMap> for HeaderSet {
    fn from(map: &HeaderMap) -> Self {
        Self::from_header_map(map)
    }
}

impl<N: Into<String>> FromIterator<(N, HeaderValue)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (N, HeaderValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}
