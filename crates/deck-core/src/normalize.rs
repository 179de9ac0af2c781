//! Card-name cleanup
//!
//! Deck lists often annotate a card with a trailing parenthesis, e.g.
//! `Lightning Bolt (M10)` or `Island (foil alt art)`. Those annotations are
//! stripped, except for the handful of real cards whose printed name ends in
//! a parenthesis.

/// Card names that legitimately end in a parenthetical
const PARENTHESIZED_NAMES: &[&str] = &[
    "B.F.M. (Big Furry Monster)",
    "B.F.M. (Big Furry Monster, Right Side)",
    "Erase (Not the Urza's Legacy One)",
    "Hazmat Suit (Used)",
    "Knight of the Kitchen Sink (a)",
    "Everythingamajig (a)",
];

/// Strip trailing parenthetical annotations from a card name.
///
/// Annotations are removed one at a time from the end until the name either
/// has no trailing parenthesis or is one of the known parenthesized card
/// names, so `normalize_card_name(normalize_card_name(x)) == normalize_card_name(x)`.
///
/// ```
/// use deck_core::normalize_card_name;
///
/// assert_eq!(normalize_card_name("Some Card (foil alt art)"), "Some Card");
/// assert_eq!(
///     normalize_card_name("B.F.M. (Big Furry Monster)"),
///     "B.F.M. (Big Furry Monster)"
/// );
/// ```
pub fn normalize_card_name(raw: &str) -> String {
    let mut current = raw.trim();

    loop {
        if is_parenthesized_name(current) {
            return current.to_string();
        }

        match split_trailing_parenthesis(current) {
            Some((head, _annotation)) if !head.is_empty() => current = head,
            _ => return current.to_string(),
        }
    }
}

/// True if `name` is one of the real cards whose name includes a parenthesis
pub fn is_parenthesized_name(name: &str) -> bool {
    let name = normalize_apostrophes(name.trim());
    PARENTHESIZED_NAMES
        .iter()
        .any(|known| names_match(known, &name))
}

/// Compare two names ignoring case, with full Unicode lowercasing
/// (`RÉSERVE` matches `Réserve`)
pub fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Split `Name (annotation)` into `("Name", "annotation")`.
///
/// Only a balanced group at the very end of the string counts.
fn split_trailing_parenthesis(name: &str) -> Option<(&str, &str)> {
    let body = name.strip_suffix(')')?;
    let open = body.rfind('(')?;
    let annotation = &body[open + 1..];
    if annotation.contains(')') {
        return None;
    }
    Some((body[..open].trim_end(), annotation))
}

/// Fold typographic apostrophes and the doubled-quote variant into `'`
fn normalize_apostrophes(s: &str) -> String {
    s.replace("''", "'").replace(['\u{2019}', '\u{2018}'], "'")
}
