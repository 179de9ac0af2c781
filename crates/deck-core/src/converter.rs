//! Converter capability interface

use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::fetch::ContentSource;
use crate::game::{GameDescriptor, GameId};
use crate::parser::parse_sections;
use std::collections::HashMap;
use std::path::Path;

/// Deck name used until the input names the deck
pub const DEFAULT_DECK_NAME: &str = "Imported Deck";

/// Per-call inputs shared by every conversion
#[derive(Clone, Copy)]
pub struct ConversionContext<'a> {
    /// Game the deck belongs to
    pub game: &'a GameDescriptor,
    /// Where file and URL bytes come from
    pub source: &'a dyn ContentSource,
    /// Placeholder deck name
    pub default_name: &'a str,
}

impl<'a> ConversionContext<'a> {
    /// Context using [`DEFAULT_DECK_NAME`] as the placeholder
    pub fn new(game: &'a GameDescriptor, source: &'a dyn ContentSource) -> Self {
        Self {
            game,
            source,
            default_name: DEFAULT_DECK_NAME,
        }
    }

    /// Replace the placeholder deck name
    pub fn with_default_name(mut self, name: &'a str) -> Self {
        self.default_name = name;
        self
    }

    /// Run the generic text parser with this context's game
    pub fn parse_text(&self, sections: &HashMap<String, String>) -> Result<Deck> {
        parse_sections(sections, &self.game.sections, &self.game.sets, self.default_name)
    }

    /// Error for an operation the converter does not offer
    pub fn unsupported(&self, operation: &'static str) -> Error {
        Error::UnsupportedOperation {
            operation,
            game: self.game.name.clone(),
        }
    }
}

/// A game-specific deck importer.
///
/// Implementations are registered explicitly with
/// [`RegistryBuilder`](crate::registry::RegistryBuilder). File and URL
/// conversion default to [`Error::UnsupportedOperation`]; text conversion
/// defaults to the generic line parser.
pub trait Converter: Send + Sync {
    /// Game this converter handles
    fn game_id(&self) -> GameId;

    /// Short name for listings and logs
    fn name(&self) -> &str;

    /// File extensions (lowercase, without dot) accepted by `convert_file`
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn convert_file(&self, _path: &Path, ctx: &ConversionContext<'_>) -> Result<Deck> {
        Err(ctx.unsupported("file"))
    }

    fn convert_url(&self, _url: &str, ctx: &ConversionContext<'_>) -> Result<Deck> {
        Err(ctx.unsupported("URL"))
    }

    fn convert_text(
        &self,
        sections: &HashMap<String, String>,
        ctx: &ConversionContext<'_>,
    ) -> Result<Deck> {
        ctx.parse_text(sections)
    }
}
