//! Core deck types produced by a conversion

use crate::normalize::names_match;
use serde::{Deserialize, Serialize};

/// A converted deck: a name plus ordered sections of card entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Deck name (placeholder until a `// NAME:` directive is seen)
    pub name: String,
    /// Sections, in the order the game declares them
    pub sections: Vec<Section>,
    /// Set once a parse pass has completed
    pub success: bool,
}

impl Deck {
    /// Create an empty deck with one section per name
    pub fn new<S: AsRef<str>>(name: impl Into<String>, section_names: &[S]) -> Self {
        Self {
            name: name.into(),
            sections: section_names
                .iter()
                .map(|s| Section::new(s.as_ref()))
                .collect(),
            success: false,
        }
    }

    /// Find a section by name (case-insensitive)
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.matches(name))
    }

    /// Find a section by name for mutation (case-insensitive)
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.matches(name))
    }

    /// Iterate every card entry across all sections
    pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.sections.iter().flat_map(|s| s.cards.iter())
    }

    /// Iterate every card entry mutably
    pub fn mappings_mut(&mut self) -> impl Iterator<Item = &mut Mapping> {
        self.sections.iter_mut().flat_map(|s| s.cards.iter_mut())
    }

    /// Sum of quantities across all sections
    pub fn total_cards(&self) -> u32 {
        self.mappings().map(|m| m.quantity).sum()
    }

    /// True if no section holds a card
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.cards.is_empty())
    }
}

/// A named subdivision of a deck (main deck, sideboard, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section name; compared case-insensitively
    pub name: String,
    /// Card entries in encounter order
    pub cards: Vec<Mapping>,
}

impl Section {
    /// Create an empty section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// Case-insensitive name comparison
    pub fn matches(&self, name: &str) -> bool {
        names_match(&self.name, name.trim())
    }

    /// Sum of quantities in this section
    pub fn total_cards(&self) -> u32 {
        self.cards.iter().map(|m| m.quantity).sum()
    }
}

/// One parsed card line awaiting candidate resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    /// Card name as written (after normalization)
    pub name: String,
    /// Set code hint, empty if the line had none
    pub set_hint: String,
    /// Number of copies, always at least 1
    pub quantity: u32,
    /// Concrete cards the name may refer to
    #[serde(default)]
    pub candidates: Vec<CandidateCard>,
}

impl Mapping {
    /// Create a mapping without a set hint
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self::with_set(name, "", quantity)
    }

    /// Create a mapping with a set hint
    pub fn with_set(name: impl Into<String>, set_hint: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            set_hint: set_hint.into(),
            quantity,
            candidates: Vec::new(),
        }
    }
}

/// A concrete card record attached to a mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCard {
    /// Card identifier in the database
    pub card_id: String,
    /// Card name as stored in the database
    pub name: String,
    /// Code of the set holding the card
    pub set_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_deck_has_sections_in_order() {
        let deck = Deck::new("Untitled", &["Main", "Sideboard", "Command Zone"]);
        let names: Vec<&str> = deck.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Main", "Sideboard", "Command Zone"]);
        assert!(!deck.success);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_section_lookup_ignores_case() {
        let mut deck = Deck::new("Untitled", &["Main", "Sideboard"]);
        assert!(deck.section("main").is_some());
        assert!(deck.section("SIDEBOARD").is_some());
        assert!(deck.section("Maybeboard").is_none());

        let french = Deck::new("Sans nom", &["Principal", "Réserve"]);
        assert!(french.section("RÉSERVE").is_some());

        deck.section_mut("main")
            .unwrap()
            .cards
            .push(Mapping::new("Island", 3));
        assert_eq!(deck.section("Main").unwrap().total_cards(), 3);
    }

    #[test]
    fn test_total_cards_spans_sections() {
        let mut deck = Deck::new("Untitled", &["Main", "Sideboard"]);
        deck.sections[0].cards.push(Mapping::new("Lightning Bolt", 4));
        deck.sections[0].cards.push(Mapping::new("Mountain", 20));
        deck.sections[1].cards.push(Mapping::with_set("Shock", "M19", 2));
        assert_eq!(deck.total_cards(), 26);
        assert_eq!(deck.mappings().count(), 3);
    }

    #[test]
    fn test_deck_serializes_to_json() {
        let mut deck = Deck::new("Burn", &["Main"]);
        deck.sections[0].cards.push(Mapping::new("Lightning Bolt", 4));
        let json = serde_json::to_value(&deck).unwrap();
        assert_eq!(json["name"], "Burn");
        assert_eq!(json["sections"][0]["cards"][0]["quantity"], 4);
        assert_eq!(json["sections"][0]["cards"][0]["set_hint"], "");
    }
}
