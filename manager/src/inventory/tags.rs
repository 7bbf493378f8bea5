use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire form of a single tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Key/value tags attached to a volume or snapshot.
///
/// Serialized as a `[{key, value}]` list. When the list repeats a key the
/// last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Tag>", into = "Vec<Tag>")]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of `key`, or the empty string when the tag is absent
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Parses `key` as a strictly positive integer.
    ///
    /// Absent, non-numeric, zero and negative values all come back as `None`.
    pub fn get_positive(&self, key: &str) -> Option<u32> {
        self.get(key)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|value| *value > 0)
            .and_then(|value| u32::try_from(value).ok())
    }

    pub fn matches(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<Vec<Tag>> for TagSet {
    fn from(tags: Vec<Tag>) -> Self {
        tags.into_iter().map(|tag| (tag.key, tag.value)).collect()
    }
}

impl From<TagSet> for Vec<Tag> {
    fn from(tags: TagSet) -> Self {
        tags.0
            .into_iter()
            .map(|(key, value)| Tag { key, value })
            .collect()
    }
}
