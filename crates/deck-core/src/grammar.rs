//! Line grammar for plain-text deck lists
//!
//! Every line of a pasted deck list is classified into exactly one
//! [`Line`] kind. Rules are tried in a fixed priority order and the first
//! rule that matches wins:
//!
//! | Rule | Example | Result |
//! |---|---|---|
//! | deck name | `// NAME: My Big Red Deck` | [`Line::DeckName`] |
//! | comment | `// sideboard tech` | [`Line::Comment`] |
//! | quantity first | `4x Lightning Bolt` | [`Line::Card`] |
//! | quantity last | `Lightning Bolt x4` | [`Line::Card`] |
//! | set bracket | `4 [M10] Lightning Bolt`, `2 Shock [M19]` | [`Line::Card`] with set |
//! | stray brackets | `1 Lightning Bolt [M10] foil`, `Shock [M19] (foil) x2` | [`Line::Card`] |
//! | anything else | `Creatures (20)` | [`Line::Unrecognized`] |
//!
//! The quantity-first and quantity-last rules cannot both match one line:
//! the first needs a leading digit, the second a leading letter. The first
//! three card rules reject names containing `[` or `]`; such lines fall
//! through to the stray-bracket rules, which accept any name and keep a
//! trailing `[SET]` left over after normalization as the set hint.

use crate::normalize::normalize_card_name;
use regex::Regex;
use std::sync::LazyLock;

/// Marker that starts a comment line
pub const COMMENT_MARKER: &str = "//";

/// `// NAME: deck name`
static DECK_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//\s*(?i:NAME):\s*(.*)$").unwrap());

/// `4 Lightning Bolt`, `4x Lightning Bolt`, `4 x Lightning Bolt`
static QUANTITY_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\s*[xX])?\s+(\p{L}[^\[\]]*)$").unwrap());

/// `Lightning Bolt x4`, `Lightning Bolt 4`
static QUANTITY_LAST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\p{L}[^\[\]]*?)\s+[xX]*\s*(\d+)$").unwrap());

/// `4 [M10] Lightning Bolt`, `4 Lightning Bolt [M10]`
static SET_BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+)(?:\s*[xX])?\s+(?:\[([^\[\]]*)\]\s*(\p{L}[^\[\]]*)|(\p{L}[^\[\]]*?)\s*\[([^\[\]]*)\])$",
    )
    .unwrap()
});

/// Quantity first, any name starting with a letter
static ANY_QUANTITY_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:\s*[xX])?\s+(\p{L}.*)$").unwrap());

/// Quantity last, any name starting with a letter
static ANY_QUANTITY_LAST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\p{L}.*?)\s+[xX]*\s*(\d+)$").unwrap());

/// `Lightning Bolt [M10]` after annotations are stripped
static TRAILING_SET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\p{L}[^\[\]]*?)\s*\[([^\[\]]*)\]$").unwrap());

/// A card entry extracted from one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLine {
    /// Normalized card name
    pub name: String,
    /// Set code from a `[SET]` bracket, empty if none
    pub set_hint: String,
    /// Number of copies (never zero)
    pub quantity: u32,
}

/// Classification of a single deck-list line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `// NAME: ...` directive carrying the deck name
    DeckName(String),
    /// Any other `//` line
    Comment,
    /// A card entry
    Card(CardLine),
    /// Blank, free-form or malformed content
    Unrecognized,
}

/// Classify one line of deck-list text.
///
/// Surrounding whitespace is ignored. Lines whose quantity is zero or does not
/// fit in a `u32` are [`Line::Unrecognized`].
pub fn classify_line(line: &str) -> Line {
    let line = line.trim();

    if line.is_empty() {
        return Line::Unrecognized;
    }

    if line.starts_with(COMMENT_MARKER) {
        if let Some(caps) = DECK_NAME.captures(line) {
            let name = caps[1].trim();
            if !name.is_empty() {
                return Line::DeckName(name.to_string());
            }
        }
        return Line::Comment;
    }

    if let Some(caps) = QUANTITY_FIRST.captures(line) {
        return card_line(&caps[1], &caps[2], "");
    }

    if let Some(caps) = QUANTITY_LAST.captures(line) {
        return card_line(&caps[2], &caps[1], "");
    }

    if let Some(caps) = SET_BRACKET.captures(line) {
        let (name, set) = match (caps.get(2), caps.get(3)) {
            (Some(set), Some(name)) => (name.as_str(), set.as_str()),
            _ => (
                caps.get(4).map_or("", |m| m.as_str()),
                caps.get(5).map_or("", |m| m.as_str()),
            ),
        };
        return card_line(&caps[1], name, set.trim());
    }

    if let Some(caps) = ANY_QUANTITY_FIRST.captures(line) {
        return stray_bracket_line(&caps[1], &caps[2]);
    }

    if let Some(caps) = ANY_QUANTITY_LAST.captures(line) {
        return stray_bracket_line(&caps[2], &caps[1]);
    }

    Line::Unrecognized
}

fn stray_bracket_line(quantity: &str, name: &str) -> Line {
    let name = normalize_card_name(name);
    match TRAILING_SET.captures(&name) {
        Some(caps) => card_line(quantity, &caps[1], caps[2].trim()),
        None => card_line(quantity, &name, ""),
    }
}

/// Build a card line from raw captures.
///
/// Returns [`Line::Unrecognized`] for a zero or overflowing quantity or a name
/// that normalizes to nothing.
pub fn card_line(quantity: &str, name: &str, set_hint: &str) -> Line {
    let quantity = match quantity.parse::<u32>() {
        Ok(q) if q > 0 => q,
        _ => return Line::Unrecognized,
    };

    let name = normalize_card_name(name);
    if name.is_empty() {
        return Line::Unrecognized;
    }

    Line::Card(CardLine {
        name,
        set_hint: set_hint.to_string(),
        quantity,
    })
}
