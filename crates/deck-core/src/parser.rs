//! Generic text parser for games without a dedicated converter

use crate::deck::{Deck, Mapping};
use crate::error::{Error, Result};
use crate::game::CardSet;
use crate::grammar::{classify_line, Line};
use crate::matching::populate_candidates;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Parse section texts into a deck and populate candidates.
///
/// The deck gets exactly one section per entry of `section_names`, in that
/// order. Every key of `sections` must name one of them (case-insensitive),
/// otherwise [`Error::UnknownSection`] is returned. Texts are processed in
/// deck-section order, so a `// NAME:` directive in a later section wins.
pub fn parse_sections<S: AsRef<str>>(
    sections: &HashMap<String, String>,
    section_names: &[S],
    sets: &[CardSet],
    default_name: &str,
) -> Result<Deck> {
    parse_sections_with(sections, section_names, sets, default_name, classify_line)
}

/// Same as [`parse_sections`] with a custom line classifier
pub fn parse_sections_with<S, F>(
    sections: &HashMap<String, String>,
    section_names: &[S],
    sets: &[CardSet],
    default_name: &str,
    classify: F,
) -> Result<Deck>
where
    S: AsRef<str>,
    F: Fn(&str) -> Line,
{
    let mut deck = Deck::new(default_name, section_names);

    let mut ordered = Vec::with_capacity(sections.len());
    for (key, text) in sections {
        let index = deck
            .sections
            .iter()
            .position(|s| s.matches(key))
            .ok_or_else(|| Error::UnknownSection(key.clone()))?;
        ordered.push((index, key.as_str(), text.as_str()));
    }
    ordered.sort();

    for (index, key, text) in ordered {
        let added = parse_text_into(&mut deck, index, text, &classify);
        debug!(section = key, cards = added, "parsed section text");
    }

    populate_candidates(&mut deck, sets);
    deck.success = true;
    Ok(deck)
}

/// Parse one blob of text into the section at `index`, returning the number
/// of card entries added.
///
/// Deck-name directives update `deck.name`; comments and unrecognized lines
/// are dropped.
pub fn parse_text_into<F>(deck: &mut Deck, index: usize, text: &str, classify: F) -> usize
where
    F: Fn(&str) -> Line,
{
    let mut added = 0;

    for line in split_lines(text) {
        match classify(line) {
            Line::DeckName(name) => {
                trace!(name = %name, "deck name directive");
                deck.name = name;
            }
            Line::Card(card) => {
                deck.sections[index]
                    .cards
                    .push(Mapping::with_set(card.name, card.set_hint, card.quantity));
                added += 1;
            }
            Line::Comment => {}
            Line::Unrecognized => trace!(line, "ignoring unrecognized line"),
        }
    }

    added
}

/// Split text on `\n` or `\r\n`, dropping blank lines
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|l| !l.trim().is_empty())
}
