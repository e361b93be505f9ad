pub mod barangay;
pub mod catalog;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

pub use catalog::{Catalog, Position};

// Position name -> selected candidate names
pub type Selections = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: i64,
    pub voter_name: String,
    pub contact_number: Option<String>,
    pub barangay: Option<String>,
    pub votes: Selections,
    pub timestamp: DateTime<Utc>,
}

/// A submission that has passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVote {
    pub voter_name: String,
    pub contact_number: Option<String>,
    pub barangay: Option<String>,
    pub votes: Selections,
}

impl NewVote {
    pub fn into_record(self, id: i64, timestamp: DateTime<Utc>) -> VoteRecord {
        VoteRecord {
            id,
            voter_name: self.voter_name,
            contact_number: self.contact_number,
            barangay: self.barangay,
            votes: self.votes,
            timestamp,
        }
    }
}

/// Insertion-ordered string map that serializes as a JSON object.
///
/// Results are keyed by position, candidate and barangay names and are emitted
/// in ballot order rather than alphabetically.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }
}

#[cfg(test)]
impl<V> OrderedMap<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
