//! Candidate catalog loaded once at startup.
//!
//! The file maps each position to its candidates:
//!
//! ```json
//! { "MAYOR": { "candidates": ["A", "B"] },
//!   "MEMBER, SANGGUNIANG PANLUNGSOD": { "candidates": ["C1", "C2"], "max_votes": 8 } }
//! ```
//!
//! Position order in the file is kept as ballot order.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// The at-large council seat, the only position with more than one selection by default.
pub const COUNCIL_POSITION: &str = "MEMBER, SANGGUNIANG PANLUNGSOD";
pub const COUNCIL_MAX_VOTES: usize = 8;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub name: String,
    pub candidates: Vec<String>,
    pub max_votes: usize,
}

impl Position {
    pub fn has_candidate(&self, name: &str) -> bool {
        self.candidates.iter().any(|c| c == name)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    positions: Vec<Position>,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position(&self, name: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }
}

fn default_max_votes(position: &str) -> usize {
    if position == COUNCIL_POSITION {
        COUNCIL_MAX_VOTES
    } else {
        1
    }
}

#[derive(Deserialize, Serialize)]
struct PositionEntry {
    candidates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_votes: Option<usize>,
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of position names to candidate lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
        let mut positions: Vec<Position> = Vec::new();

        while let Some((name, entry)) = access.next_entry::<String, PositionEntry>()? {
            if positions.iter().any(|p| p.name == name) {
                return Err(de::Error::custom(format!("duplicate position: {name}")));
            }

            if let Some(repeated) = entry
                .candidates
                .iter()
                .enumerate()
                .find_map(|(i, c)| entry.candidates[..i].contains(c).then_some(c))
            {
                return Err(de::Error::custom(format!(
                    "duplicate candidate {repeated} for {name}"
                )));
            }

            let max_votes = entry.max_votes.unwrap_or_else(|| default_max_votes(&name));
            if max_votes == 0 {
                return Err(de::Error::custom(format!("max_votes for {name} must be at least 1")));
            }

            positions.push(Position {
                name,
                candidates: entry.candidates,
                max_votes,
            });
        }

        Ok(Catalog { positions })
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.positions.len()))?;
        for position in &self.positions {
            let entry = PositionEntry {
                candidates: position.candidates.clone(),
                max_votes: Some(position.max_votes),
            };
            map.serialize_entry(&position.name, &entry)?;
        }
        map.end()
    }
}
