use std::collections::HashMap;

/// Raw value → display text substitutions.
///
/// Lookups are exact (case-sensitive) and only affect the text shown; color
/// rules always see the raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOverrides(HashMap<String, String>);

impl DisplayOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, raw: impl Into<String>, display: impl Into<String>) {
        self.0.insert(raw.into(), display.into());
    }

    /// Text to show for `raw`. An empty override falls through to the raw
    /// value.
    pub fn display<'a>(&'a self, raw: &'a str) -> &'a str {
        match self.0.get(raw) {
            Some(text) if !text.is_empty() => text,
            _ => raw,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DisplayOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
