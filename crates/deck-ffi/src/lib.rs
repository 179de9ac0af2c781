//! C FFI bindings for deck-core
//!
//! This crate provides a C-compatible API so a host application (card game
//! client, deck editor) can run conversions through the global engine.
//! Game descriptors and section maps cross the boundary as JSON strings.

use deck_core::{Deck, GameDescriptor};
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;

/// Opaque handle to a converted deck
pub struct FfiDeck {
    inner: Deck,
}

unsafe fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

unsafe fn read_game(game_json: *const c_char) -> Option<GameDescriptor> {
    read_str(game_json).and_then(|json| serde_json::from_str(json).ok())
}

fn into_handle(result: deck_core::Result<Deck>) -> *mut FfiDeck {
    match result {
        Ok(deck) => Box::into_raw(Box::new(FfiDeck { inner: deck })),
        Err(_) => ptr::null_mut(),
    }
}

fn into_c_string(s: &str) -> *mut c_char {
    CString::new(s)
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Convert pasted text
///
/// # Safety
/// - `game_json` must be a valid C string holding a game descriptor
/// - `sections_json` must be a valid C string holding a `{"section": "text"}` object
/// - Returns null on error
#[no_mangle]
pub unsafe extern "C" fn dc_convert_text(
    game_json: *const c_char,
    sections_json: *const c_char,
) -> *mut FfiDeck {
    let Some(game) = read_game(game_json) else {
        return ptr::null_mut();
    };
    let Some(sections) = read_str(sections_json)
        .and_then(|json| serde_json::from_str::<HashMap<String, String>>(json).ok())
    else {
        return ptr::null_mut();
    };

    into_handle(deck_core::convert_text(&sections, &game))
}

/// Convert a deck file
///
/// # Safety
/// - `game_json` must be a valid C string holding a game descriptor
/// - `path` must be a valid C string
/// - Returns null on error, including games without a file converter
#[no_mangle]
pub unsafe extern "C" fn dc_convert_file(game_json: *const c_char, path: *const c_char) -> *mut FfiDeck {
    match (read_game(game_json), read_str(path)) {
        (Some(game), Some(path)) => into_handle(deck_core::convert_file(Path::new(path), &game)),
        _ => ptr::null_mut(),
    }
}

/// Download and convert a deck page
///
/// # Safety
/// - `game_json` must be a valid C string holding a game descriptor
/// - `url` must be a valid C string
/// - Returns null on error, including games without a URL converter
#[no_mangle]
pub unsafe extern "C" fn dc_convert_url(game_json: *const c_char, url: *const c_char) -> *mut FfiDeck {
    match (read_game(game_json), read_str(url)) {
        (Some(game), Some(url)) => into_handle(deck_core::convert_url(url, &game)),
        _ => ptr::null_mut(),
    }
}

/// Free a deck
///
/// # Safety
/// - `deck` must be a valid pointer returned by a `dc_convert_*` function or null
#[no_mangle]
pub unsafe extern "C" fn dc_free_deck(deck: *mut FfiDeck) {
    if !deck.is_null() {
        drop(Box::from_raw(deck));
    }
}

/// Get the deck name
///
/// # Safety
/// - `deck` must be a valid deck pointer
/// - Caller must free the returned string with `dc_free_string`
#[no_mangle]
pub unsafe extern "C" fn dc_deck_name(deck: *const FfiDeck) -> *mut c_char {
    if deck.is_null() {
        return ptr::null_mut();
    }
    into_c_string(&(*deck).inner.name)
}

/// Serialize the whole deck, candidates included, as JSON
///
/// # Safety
/// - `deck` must be a valid deck pointer
/// - Caller must free the returned string with `dc_free_string`
#[no_mangle]
pub unsafe extern "C" fn dc_deck_to_json(deck: *const FfiDeck) -> *mut c_char {
    if deck.is_null() {
        return ptr::null_mut();
    }
    match serde_json::to_string(&(*deck).inner) {
        Ok(json) => into_c_string(&json),
        Err(_) => ptr::null_mut(),
    }
}

/// Get the number of sections
///
/// # Safety
/// - `deck` must be a valid deck pointer
#[no_mangle]
pub unsafe extern "C" fn dc_deck_section_count(deck: *const FfiDeck) -> usize {
    if deck.is_null() {
        return 0;
    }
    (*deck).inner.sections.len()
}

/// Get a section name by index
///
/// # Safety
/// - `deck` must be a valid deck pointer
/// - Returns null if index is out of bounds
/// - Caller must free the returned string with `dc_free_string`
#[no_mangle]
pub unsafe extern "C" fn dc_deck_section_name(deck: *const FfiDeck, section: usize) -> *mut c_char {
    if deck.is_null() {
        return ptr::null_mut();
    }

    (&(*deck)
        .inner
        .sections)
        .get(section)
        .map(|s| into_c_string(&s.name))
        .unwrap_or(ptr::null_mut())
}

/// Get the number of card entries in a section
///
/// # Safety
/// - `deck` must be a valid deck pointer
#[no_mangle]
pub unsafe extern "C" fn dc_deck_card_count(deck: *const FfiDeck, section: usize) -> usize {
    if deck.is_null() {
        return 0;
    }
    (&(*deck)
        .inner
        .sections)
        .get(section)
        .map_or(0, |s| s.cards.len())
}

/// Get a card name
///
/// # Safety
/// - `deck` must be a valid deck pointer
/// - Returns null if section or card is out of bounds
/// - Caller must free the returned string with `dc_free_string`
#[no_mangle]
pub unsafe extern "C" fn dc_deck_card_name(deck: *const FfiDeck, section: usize, card: usize) -> *mut c_char {
    if deck.is_null() {
        return ptr::null_mut();
    }

    (&(*deck)
        .inner
        .sections)
        .get(section)
        .and_then(|s| s.cards.get(card))
        .map(|m| into_c_string(&m.name))
        .unwrap_or(ptr::null_mut())
}

/// Get a card quantity, 0 if out of bounds
///
/// # Safety
/// - `deck` must be a valid deck pointer
#[no_mangle]
pub unsafe extern "C" fn dc_deck_card_quantity(deck: *const FfiDeck, section: usize, card: usize) -> u32 {
    if deck.is_null() {
        return 0;
    }

    (&(*deck)
        .inner
        .sections)
        .get(section)
        .and_then(|s| s.cards.get(card))
        .map_or(0, |m| m.quantity)
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a dc_* function or null
#[no_mangle]
pub unsafe extern "C" fn dc_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = r#"{
        "id": "5f1e2d3c-0000-4000-8000-00000000abcd",
        "name": "Plain Game",
        "sections": ["Main", "Sideboard"]
    }"#;

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    unsafe fn take_string(s: *mut c_char) -> String {
        assert!(!s.is_null());
        let owned = CStr::from_ptr(s).to_str().unwrap().to_string();
        dc_free_string(s);
        owned
    }

    #[test]
    fn test_convert_text_roundtrip() {
        let game = c(GAME);
        let sections = c(r#"{"Main": "4 Lightning Bolt\n// NAME: FFI Deck", "Sideboard": "Shock x2"}"#);

        unsafe {
            let deck = dc_convert_text(game.as_ptr(), sections.as_ptr());
            assert!(!deck.is_null());

            assert_eq!(take_string(dc_deck_name(deck)), "FFI Deck");
            assert_eq!(dc_deck_section_count(deck), 2);
            assert_eq!(take_string(dc_deck_section_name(deck, 1)), "Sideboard");
            assert_eq!(dc_deck_card_count(deck, 0), 1);
            assert_eq!(take_string(dc_deck_card_name(deck, 0, 0)), "Lightning Bolt");
            assert_eq!(dc_deck_card_quantity(deck, 1, 0), 2);
            assert_eq!(dc_deck_card_quantity(deck, 5, 0), 0);
            assert!(dc_deck_card_name(deck, 0, 9).is_null());

            let json = take_string(dc_deck_to_json(deck));
            assert!(json.contains("\"success\":true"));

            dc_free_deck(deck);
        }
    }

    #[test]
    fn test_file_conversion_without_converter_is_null() {
        let game = c(GAME);
        let path = c("deck.txt");
        unsafe {
            assert!(dc_convert_file(game.as_ptr(), path.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_bad_input_is_null() {
        let bad = c("{not json");
        let sections = c("{}");
        unsafe {
            assert!(dc_convert_text(bad.as_ptr(), sections.as_ptr()).is_null());
            assert!(dc_convert_text(ptr::null(), sections.as_ptr()).is_null());
            assert_eq!(dc_deck_section_count(ptr::null()), 0);
            dc_free_deck(ptr::null_mut());
        }
    }
}
