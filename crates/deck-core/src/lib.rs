//! deck-core: Core library for converting trading-card-game deck lists
//!
//! This library provides functionality to:
//! - Classify free-form deck-list lines (`4x Lightning Bolt`, `Island x20`,
//!   `// NAME: Burn`) and clean up card names
//! - Parse pasted section texts into a structured [`Deck`]
//! - Dispatch file, URL and text conversions to game-specific converters,
//!   falling back to the generic parser for text
//! - Attach candidate card records from a game's set catalog
//! - Discover deck files on disk

pub mod converter;
pub mod converters;
pub mod deck;
pub mod error;
pub mod fetch;
pub mod game;
pub mod grammar;
pub mod matching;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod scanner;

pub use converter::{ConversionContext, Converter, DEFAULT_DECK_NAME};
pub use deck::{CandidateCard, Deck, Mapping, Section};
pub use error::{Error, Result};
pub use fetch::{ContentSource, DefaultSource};
pub use game::{CardRecord, CardSet, GameDescriptor, GameId};
pub use grammar::{classify_line, CardLine, Line};
pub use matching::populate_candidates;
pub use normalize::normalize_card_name;
pub use parser::parse_sections;
pub use registry::{ConversionEngine, ConverterRegistry, RegistryBuilder};
pub use scanner::{scan_deck_files, ScanResult};

use std::collections::HashMap;
use std::path::Path;

/// Convert a deck file with the global engine
pub fn convert_file(path: &Path, game: &GameDescriptor) -> Result<Deck> {
    ConversionEngine::global().convert_file(path, game)
}

/// Convert a remote deck page with the global engine
pub fn convert_url(url: &str, game: &GameDescriptor) -> Result<Deck> {
    ConversionEngine::global().convert_url(url, game)
}

/// Convert pasted section texts with the global engine
pub fn convert_text(sections: &HashMap<String, String>, game: &GameDescriptor) -> Result<Deck> {
    ConversionEngine::global().convert_text(sections, game)
}
