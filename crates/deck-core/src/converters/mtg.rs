//! Magic: The Gathering converter
//!
//! Understands the list formats MTG players actually paste or export:
//! - `.mwdeck` / `.dec`: Magic Workstation and Apprentice lists, where
//!   sideboard lines carry an `SB:` prefix
//! - `.txt`: MTGO / Arena exports, where a `Sideboard` header or the first
//!   blank line after the main deck starts the sideboard
//! - `.csv`: collection-manager exports with Count/Name/Edition columns
//!
//! Arena lines such as `4 Lightning Bolt (M10) 146` are read with their set
//! code; everything else goes through the generic line grammar.

use crate::converter::{ConversionContext, Converter};
use crate::deck::{Deck, Mapping};
use crate::error::{Error, Result};
use crate::game::{GameDescriptor, GameId};
use crate::grammar::{card_line, classify_line, CardLine, Line};
use crate::matching::populate_candidates;
use crate::normalize::normalize_card_name;
use crate::parser::{parse_sections_with, split_lines};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Game id of Magic: The Gathering
pub const MTG_GAME_ID: GameId = GameId::from_u128(0xa6c8d2e8_7cd8_11dd_8f94_e62b56d89593);

const MAIN: &str = "Main";
const SIDEBOARD: &str = "Sideboard";

/// `4 Lightning Bolt (M10) 146`
static ARENA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)[xX]?\s+(\p{L}.*?)\s+\(([A-Za-z0-9]{2,6})\)\s+[A-Za-z0-9-]+$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Board {
    Main,
    Sideboard,
}

impl Board {
    fn section_name(self) -> &'static str {
        match self {
            Board::Main => MAIN,
            Board::Sideboard => SIDEBOARD,
        }
    }
}

/// Converter for Magic: The Gathering deck lists
#[derive(Debug, Clone, Copy, Default)]
pub struct MtgConverter;

impl MtgConverter {
    /// Descriptor for MTG without any card sets
    pub fn descriptor() -> GameDescriptor {
        GameDescriptor::new(MTG_GAME_ID, "Magic: The Gathering", vec![MAIN, SIDEBOARD])
    }
}

impl Converter for MtgConverter {
    fn game_id(&self) -> GameId {
        MTG_GAME_ID
    }

    fn name(&self) -> &str {
        "mtg"
    }

    fn file_extensions(&self) -> &[&str] {
        &["mwdeck", "dec", "txt", "csv"]
    }

    fn convert_file(&self, path: &Path, ctx: &ConversionContext<'_>) -> Result<Deck> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;

        if !self.file_extensions().contains(&extension.as_str()) {
            return Err(Error::UnsupportedFormat(path.to_path_buf()));
        }

        let text = ctx.source.read_file(path)?;
        let mut deck = Deck::new(ctx.default_name, &ctx.game.sections);

        match extension.as_str() {
            "mwdeck" | "dec" => parse_mwdeck(&text, &mut deck)?,
            "csv" => parse_csv_deck(&text, path, &mut deck)?,
            _ => parse_plain(&text, &mut deck)?,
        }

        debug!(path = %path.display(), format = %extension, cards = deck.total_cards(), "converted MTG deck file");
        Ok(finish(deck, ctx))
    }

    fn convert_url(&self, url: &str, ctx: &ConversionContext<'_>) -> Result<Deck> {
        let text = ctx.source.fetch_url(url)?;
        let mut deck = Deck::new(ctx.default_name, &ctx.game.sections);
        parse_plain(&text, &mut deck)?;
        Ok(finish(deck, ctx))
    }

    fn convert_text(
        &self,
        sections: &HashMap<String, String>,
        ctx: &ConversionContext<'_>,
    ) -> Result<Deck> {
        parse_sections_with(
            sections,
            &ctx.game.sections,
            &ctx.game.sets,
            ctx.default_name,
            classify_mtg_line,
        )
    }
}

/// Classify a line, accepting Arena `(SET) number` suffixes
pub fn classify_mtg_line(line: &str) -> Line {
    let line = line.trim();
    if let Some(caps) = ARENA_LINE.captures(line) {
        return card_line(&caps[1], &caps[2], &caps[3]);
    }
    classify_line(line)
}

fn finish(mut deck: Deck, ctx: &ConversionContext<'_>) -> Deck {
    populate_candidates(&mut deck, &ctx.game.sets);
    deck.success = true;
    deck
}

fn push_card(deck: &mut Deck, board: Board, card: CardLine) -> Result<()> {
    let name = board.section_name();
    let section = deck
        .section_mut(name)
        .ok_or_else(|| Error::UnknownSection(name.to_string()))?;
    section
        .cards
        .push(Mapping::with_set(card.name, card.set_hint, card.quantity));
    Ok(())
}

/// `Sideboard`, `Sideboard:`, `Deck`, `Main deck` ...
fn board_header(line: &str) -> Option<Board> {
    let header = line.trim().trim_end_matches(':').trim().to_ascii_lowercase();
    match header.as_str() {
        "deck" | "main" | "maindeck" | "main deck" => Some(Board::Main),
        "sideboard" | "side" | "sb" => Some(Board::Sideboard),
        _ => None,
    }
}

fn strip_sideboard_prefix(line: &str) -> Option<&str> {
    line.get(..3)
        .filter(|prefix| prefix.eq_ignore_ascii_case("SB:"))
        .map(|_| line[3..].trim())
}

/// Magic Workstation / Apprentice list
fn parse_mwdeck(text: &str, deck: &mut Deck) -> Result<()> {
    for line in split_lines(text) {
        let line = line.trim();
        let (board, rest) = match strip_sideboard_prefix(line) {
            Some(rest) => (Board::Sideboard, rest),
            None => (Board::Main, line),
        };

        match classify_mtg_line(rest) {
            Line::DeckName(name) => deck.name = name,
            Line::Card(card) => push_card(deck, board, card)?,
            Line::Comment | Line::Unrecognized => {}
        }
    }
    Ok(())
}

/// MTGO / Arena text export
///
/// An explicit `Sideboard` header wins. Without one, the final
/// blank-line-separated block becomes the sideboard when it holds nothing but
/// card lines and main-deck cards come before it; grouped lists with
/// `// Creatures` style labels stay in the main deck.
fn parse_plain(text: &str, deck: &mut Deck) -> Result<()> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    // Decide where an unlabeled sideboard starts before reading any card
    let sideboard_start = if lines.iter().any(|line| board_header(line).is_some()) {
        None
    } else {
        trailing_card_block(&lines)
    };

    // Read cards, switching boards on headers or the trailing block
    let mut board = Board::Main;
    for (idx, line) in lines.iter().enumerate() {
        if sideboard_start == Some(idx) {
            board = Board::Sideboard;
        }
        if line.is_empty() {
            continue;
        }

        if let Some(header) = board_header(line) {
            board = header;
            continue;
        }

        match classify_mtg_line(line) {
            Line::DeckName(name) => deck.name = name,
            Line::Card(card) => push_card(deck, board, card)?,
            Line::Comment | Line::Unrecognized => {}
        }
    }
    Ok(())
}

/// Start index of the last block of `lines` if it is made only of card
/// lines and follows at least one earlier card line
fn trailing_card_block(lines: &[&str]) -> Option<usize> {
    let is_card = |line: &&str| matches!(classify_mtg_line(line), Line::Card(_));

    let end = lines.iter().rposition(|line| !line.is_empty())? + 1;
    let start = lines[..end].iter().rposition(|line| line.is_empty())? + 1;

    let block_is_cards = lines[start..end].iter().all(is_card);
    let cards_before = lines[..start].iter().any(is_card);
    (block_is_cards && cards_before).then_some(start)
}

/// Collection-manager CSV export
fn parse_csv_deck(text: &str, path: &Path, deck: &mut Deck) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    // Locate columns by header name
    let headers = reader
        .headers()
        .map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();

    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let missing = |column: &str| Error::CsvLayout {
        path: path.to_path_buf(),
        message: format!("no {} column found in CSV", column),
    };

    let count_col = find(&["count", "quantity", "qty"]).ok_or_else(|| missing("Count"))?;
    let name_col = find(&["name", "card name", "card"]).ok_or_else(|| missing("Name"))?;
    let set_col = find(&["edition", "set", "set code"]);
    let board_col = find(&["board", "section"]);

    // Process rows; rows without a usable count and name are skipped
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

        let quantity = record
            .get(count_col)
            .and_then(|c| c.parse::<u32>().ok())
            .filter(|&q| q > 0);
        let name = record.get(name_col).map(normalize_card_name).unwrap_or_default();

        let Some(quantity) = quantity.filter(|_| !name.is_empty()) else {
            warn!(
                row = row_idx + 2,
                path = %path.display(),
                "skipping CSV row without a valid count and name"
            );
            continue;
        };

        let set_hint = set_col.and_then(|i| record.get(i)).unwrap_or_default();
        let board = csv_board(deck, board_col.and_then(|i| record.get(i)).unwrap_or_default());

        let section = deck
            .section_mut(&board)
            .ok_or_else(|| Error::UnknownSection(board.clone()))?;
        section.cards.push(Mapping::with_set(name, set_hint, quantity));
    }

    Ok(())
}

/// Map a CSV board value onto a deck section name
fn csv_board(deck: &Deck, value: &str) -> String {
    if value.is_empty() {
        return MAIN.to_string();
    }
    if let Some(section) = deck.section(value) {
        return section.name.clone();
    }
    match board_header(value) {
        Some(board) => board.section_name().to_string(),
        None => {
            warn!(board = value, "unknown CSV board, using main deck");
            MAIN.to_string()
        }
    }
}
