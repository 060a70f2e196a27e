//! Tonal palette and tone key types.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of one tone in a tonal palette (`"0"`, `"40"`, `"99"`, ...).
///
/// Keys are kept as the exact strings the generator produced so they
/// serialize back unchanged, but they sort numerically: `"5" < "10" < "100"`.
/// Keys that are not numbers sort after all numeric keys, by string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneKey(String);

impl ToneKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric tone value, if the key is a number.
    pub fn value(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl Ord for ToneKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.value(), other.value()) {
            (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ToneKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ToneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToneKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ToneKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A tonal palette: tone key -> color string, in ascending tone order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TonalPalette {
    tones: BTreeMap<ToneKey, String>,
}

impl TonalPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tone: &ToneKey) -> Option<&str> {
        self.tones.get(tone).map(String::as_str)
    }

    pub fn insert(&mut self, tone: impl Into<ToneKey>, color: impl Into<String>) {
        self.tones.insert(tone.into(), color.into());
    }

    pub fn contains(&self, tone: &ToneKey) -> bool {
        self.tones.contains_key(tone)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ToneKey, &str)> {
        self.tones.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ToneKey> {
        self.tones.keys()
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }
}

impl<K: Into<ToneKey>, V: Into<String>> FromIterator<(K, V)> for TonalPalette {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { tones: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
