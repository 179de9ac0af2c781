//! Game descriptors supplied by the card database
//!
//! A descriptor tells the converter which game a deck belongs to, which
//! sections a deck of that game has, and which card sets exist. Descriptors
//! are stored as JSON files.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque game identifier, used only to look up converters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// Wrap a raw UUID
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Build an id from its 128-bit value (for static converter tables)
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Generate a fresh random id
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Everything the converter needs to know about a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDescriptor {
    /// Unique game identifier
    pub id: GameId,
    /// Human-readable game name
    pub name: String,
    /// Deck section names, in display order
    pub sections: Vec<String>,
    /// Known card sets
    #[serde(default)]
    pub sets: Vec<CardSet>,
}

impl GameDescriptor {
    /// Create a descriptor without any card sets
    pub fn new<S: Into<String>>(id: GameId, name: impl Into<String>, sections: Vec<S>) -> Self {
        Self {
            id,
            name: name.into(),
            sections: sections.into_iter().map(Into::into).collect(),
            sets: Vec::new(),
        }
    }

    /// Load a descriptor from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the descriptor to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Find a set by its code (case-insensitive)
    pub fn find_set(&self, code: &str) -> Option<&CardSet> {
        self.sets.iter().find(|s| s.code.eq_ignore_ascii_case(code))
    }
}

/// A card set in the game's catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSet {
    /// Set identifier
    pub id: String,
    /// Set name
    pub name: String,
    /// Short set code (e.g. "M10")
    pub code: String,
    /// Whether the matcher may pick cards from this set
    #[serde(default = "default_include")]
    pub include_in_searches: bool,
    /// Cards in the set
    #[serde(default)]
    pub cards: Vec<CardRecord>,
}

fn default_include() -> bool {
    true
}

/// A single card in a set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRecord {
    /// Card identifier
    pub id: String,
    /// Card name
    pub name: String,
}
