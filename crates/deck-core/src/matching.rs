//! Candidate population
//!
//! Attaches concrete card records to each parsed entry by exact,
//! case-insensitive name match. Fuzzy matching is left to the card database.

use crate::deck::{CandidateCard, Deck, Mapping};
use crate::game::CardSet;
use crate::normalize::names_match;
use tracing::debug;

/// Fill `candidates` for every mapping in the deck from the searchable sets.
///
/// Cards from the set named by the mapping's set hint come first; sets with
/// `include_in_searches == false` are skipped. Existing candidates are
/// replaced.
pub fn populate_candidates(deck: &mut Deck, sets: &[CardSet]) {
    let searchable: Vec<&CardSet> = sets.iter().filter(|s| s.include_in_searches).collect();

    let mut unmatched = 0usize;
    for mapping in deck.mappings_mut() {
        mapping.candidates = find_candidates(mapping, &searchable);
        if mapping.candidates.is_empty() {
            unmatched += 1;
        }
    }

    debug!(
        deck = %deck.name,
        sets = searchable.len(),
        unmatched,
        "populated card candidates"
    );
}

fn find_candidates(mapping: &Mapping, sets: &[&CardSet]) -> Vec<CandidateCard> {
    let mut preferred = Vec::new();
    let mut others = Vec::new();

    for set in sets {
        let hinted = !mapping.set_hint.is_empty() && set.code.eq_ignore_ascii_case(&mapping.set_hint);
        for card in set.cards.iter().filter(|c| names_match(&c.name, &mapping.name)) {
            let candidate = CandidateCard {
                card_id: card.id.clone(),
                name: card.name.clone(),
                set_code: set.code.clone(),
            };
            if hinted {
                preferred.push(candidate);
            } else {
                others.push(candidate);
            }
        }
    }

    preferred.extend(others);
    preferred
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CardRecord;

    fn set(code: &str, include: bool, cards: &[(&str, &str)]) -> CardSet {
        CardSet {
            id: code.to_lowercase(),
            name: format!("Set {}", code),
            code: code.to_string(),
            include_in_searches: include,
            cards: cards
                .iter()
                .map(|(id, name)| CardRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_exact_name_match_ignores_case() {
        let sets = vec![set("M10", true, &[("m10-1", "Lightning Bolt"), ("m10-2", "Shock")])];
        let mut deck = Deck::new("Test", &["Main"]);
        deck.sections[0].cards.push(Mapping::new("lightning bolt", 4));

        populate_candidates(&mut deck, &sets);

        let candidates = &deck.sections[0].cards[0].candidates;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].card_id, "m10-1");
        assert_eq!(candidates[0].set_code, "M10");
    }

    #[test]
    fn test_non_ascii_name_match_ignores_case() {
        let sets = vec![set("MMA", true, &[("mma-1", "Æther Vial")])];
        let mut deck = Deck::new("Test", &["Main"]);
        deck.sections[0].cards.push(Mapping::new("æTHER VIAL", 1));

        populate_candidates(&mut deck, &sets);

        assert_eq!(deck.sections[0].cards[0].candidates[0].card_id, "mma-1");
    }

    #[test]
    fn test_excluded_sets_skipped() {
        let sets = vec![
            set("LEA", false, &[("lea-1", "Lightning Bolt")]),
            set("M10", true, &[("m10-1", "Lightning Bolt")]),
        ];
        let mut deck = Deck::new("Test", &["Main"]);
        deck.sections[0].cards.push(Mapping::new("Lightning Bolt", 4));

        populate_candidates(&mut deck, &sets);

        let ids: Vec<&str> = deck.sections[0].cards[0]
            .candidates
            .iter()
            .map(|c| c.card_id.as_str())
            .collect();
        assert_eq!(ids, vec!["m10-1"]);
    }

    #[test]
    fn test_set_hint_ordered_first() {
        let sets = vec![
            set("M10", true, &[("m10-1", "Lightning Bolt")]),
            set("M11", true, &[("m11-1", "Lightning Bolt")]),
        ];
        let mut deck = Deck::new("Test", &["Main"]);
        deck.sections[0]
            .cards
            .push(Mapping::with_set("Lightning Bolt", "m11", 4));

        populate_candidates(&mut deck, &sets);

        let ids: Vec<&str> = deck.sections[0].cards[0]
            .candidates
            .iter()
            .map(|c| c.card_id.as_str())
            .collect();
        assert_eq!(ids, vec!["m11-1", "m10-1"]);
    }

    #[test]
    fn test_unknown_card_has_no_candidates() {
        let sets = vec![set("M10", true, &[("m10-1", "Lightning Bolt")])];
        let mut deck = Deck::new("Test", &["Main"]);
        deck.sections[0].cards.push(Mapping::new("Black Lotus", 1));

        populate_candidates(&mut deck, &sets);

        assert!(deck.sections[0].cards[0].candidates.is_empty());
    }
}
