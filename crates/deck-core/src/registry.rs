//! Converter registry and conversion dispatch
//!
//! Converters are registered explicitly through [`RegistryBuilder`]. The
//! process-wide [`ConversionEngine::global`] is built once, on first use,
//! from [`converters::builtin`](crate::converters::builtin) and is read-only
//! afterwards.

use crate::converter::{ConversionContext, Converter};
use crate::converters;
use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::fetch::{ContentSource, DefaultSource};
use crate::game::{GameDescriptor, GameId};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, error};

/// Collects converters, rejecting a second claim on the same game
#[derive(Default)]
pub struct RegistryBuilder {
    converters: Vec<Box<dyn Converter>>,
    by_game: HashMap<GameId, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter; fails with [`Error::Configuration`] if its game
    /// is already claimed
    pub fn register<C: Converter + 'static>(&mut self, converter: C) -> Result<&mut Self> {
        self.register_boxed(Box::new(converter))?;
        Ok(self)
    }

    /// Register an already boxed converter
    pub fn register_boxed(&mut self, converter: Box<dyn Converter>) -> Result<()> {
        let id = converter.game_id();
        if let Some(&existing) = self.by_game.get(&id) {
            return Err(Error::Configuration(format!(
                "converter '{}' claims game {} already handled by '{}'",
                converter.name(),
                id,
                self.converters[existing].name()
            )));
        }

        self.by_game.insert(id, self.converters.len());
        self.converters.push(converter);
        Ok(())
    }

    pub fn build(self) -> ConverterRegistry {
        ConverterRegistry {
            converters: self.converters,
            by_game: self.by_game,
        }
    }
}

/// Read-only lookup table from game id to converter
pub struct ConverterRegistry {
    converters: Vec<Box<dyn Converter>>,
    by_game: HashMap<GameId, usize>,
}

impl ConverterRegistry {
    /// Build from a static table, keeping the first converter for each game.
    ///
    /// Duplicates are logged as errors; use [`RegistryBuilder`] directly to
    /// have them reported instead.
    pub fn from_table(table: Vec<Box<dyn Converter>>) -> Self {
        let mut builder = RegistryBuilder::new();
        for converter in table {
            if let Err(e) = builder.register_boxed(converter) {
                error!(error = %e, "ignoring duplicate converter registration");
            }
        }
        builder.build()
    }

    /// Converter registered for a game, if any
    pub fn get(&self, id: &GameId) -> Option<&dyn Converter> {
        self.by_game.get(id).map(|&i| self.converters[i].as_ref())
    }

    /// All converters in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Converter> {
        self.converters.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

/// Routes conversion requests to the converter registered for a game
pub struct ConversionEngine {
    registry: ConverterRegistry,
    source: Box<dyn ContentSource>,
}

static GLOBAL_ENGINE: OnceLock<ConversionEngine> = OnceLock::new();

impl ConversionEngine {
    pub fn new(registry: ConverterRegistry, source: Box<dyn ContentSource>) -> Self {
        Self { registry, source }
    }

    /// Shared engine with the built-in converters and [`DefaultSource`]
    pub fn global() -> &'static ConversionEngine {
        GLOBAL_ENGINE.get_or_init(|| {
            let registry = ConverterRegistry::from_table(converters::builtin());
            debug!(converters = registry.len(), "converter registry initialized");
            ConversionEngine::new(registry, Box::new(DefaultSource::default()))
        })
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Context for converting a deck of `game` through this engine's source
    pub fn context<'a>(&'a self, game: &'a GameDescriptor) -> ConversionContext<'a> {
        ConversionContext::new(game, self.source.as_ref())
    }

    /// Convert a local deck file; requires a game-specific converter
    pub fn convert_file(&self, path: &Path, game: &GameDescriptor) -> Result<Deck> {
        self.convert_file_with(path, &self.context(game))
    }

    /// Convert a remote deck page; requires a game-specific converter
    pub fn convert_url(&self, url: &str, game: &GameDescriptor) -> Result<Deck> {
        self.convert_url_with(url, &self.context(game))
    }

    /// Convert pasted section texts, falling back to the generic parser
    pub fn convert_text(
        &self,
        sections: &HashMap<String, String>,
        game: &GameDescriptor,
    ) -> Result<Deck> {
        self.convert_text_with(sections, &self.context(game))
    }

    /// [`convert_file`](Self::convert_file) with a caller-built context
    pub fn convert_file_with(&self, path: &Path, ctx: &ConversionContext<'_>) -> Result<Deck> {
        match self.registry.get(&ctx.game.id) {
            Some(converter) => {
                debug!(converter = converter.name(), path = %path.display(), "converting file");
                converter.convert_file(path, ctx)
            }
            None => Err(ctx.unsupported("file")),
        }
    }

    /// [`convert_url`](Self::convert_url) with a caller-built context
    pub fn convert_url_with(&self, url: &str, ctx: &ConversionContext<'_>) -> Result<Deck> {
        match self.registry.get(&ctx.game.id) {
            Some(converter) => {
                debug!(converter = converter.name(), url, "converting URL");
                converter.convert_url(url, ctx)
            }
            None => Err(ctx.unsupported("URL")),
        }
    }

    /// [`convert_text`](Self::convert_text) with a caller-built context, e.g.
    /// one carrying a custom placeholder name
    pub fn convert_text_with(
        &self,
        sections: &HashMap<String, String>,
        ctx: &ConversionContext<'_>,
    ) -> Result<Deck> {
        match self.registry.get(&ctx.game.id) {
            Some(converter) => {
                debug!(converter = converter.name(), "converting text");
                converter.convert_text(sections, ctx)
            }
            None => {
                debug!(game = %ctx.game.name, "no converter registered, using generic parser");
                ctx.parse_text(sections)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Mapping;
    use crate::parser::parse_sections;
    use std::path::PathBuf;
    use std::sync::Mutex;

    const STUB_GAME: GameId = GameId::from_u128(0x1111_2222_3333_4444_5555_6666_7777_8888);
    const OTHER_GAME: GameId = GameId::from_u128(0x9999_aaaa_bbbb_cccc_dddd_eeee_ffff_0000);

    struct StubConverter {
        label: &'static str,
        game: GameId,
    }

    impl Converter for StubConverter {
        fn game_id(&self) -> GameId {
            self.game
        }

        fn name(&self) -> &str {
            self.label
        }

        fn convert_file(&self, path: &Path, ctx: &ConversionContext<'_>) -> Result<Deck> {
            let mut deck = Deck::new(self.label, &ctx.game.sections);
            deck.sections[0]
                .cards
                .push(Mapping::new(path.display().to_string(), 1));
            deck.success = true;
            Ok(deck)
        }

        fn convert_text(
            &self,
            _sections: &HashMap<String, String>,
            ctx: &ConversionContext<'_>,
        ) -> Result<Deck> {
            let mut deck = Deck::new(self.label, &ctx.game.sections);
            deck.success = true;
            Ok(deck)
        }
    }

    /// Records requests instead of touching the network
    #[derive(Default)]
    struct MemorySource {
        requests: Mutex<Vec<String>>,
    }

    impl ContentSource for MemorySource {
        fn read_file(&self, path: &Path) -> Result<String> {
            self.requests.lock().unwrap().push(path.display().to_string());
            Ok(String::new())
        }

        fn fetch_url(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(String::new())
        }
    }

    fn game(id: GameId) -> GameDescriptor {
        GameDescriptor::new(id, "Stub Game", vec!["Main", "Sideboard"])
    }

    fn engine() -> ConversionEngine {
        let mut builder = RegistryBuilder::new();
        builder
            .register(StubConverter {
                label: "stub",
                game: STUB_GAME,
            })
            .unwrap();
        ConversionEngine::new(builder.build(), Box::new(MemorySource::default()))
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(StubConverter {
                label: "first",
                game: STUB_GAME,
            })
            .unwrap();
        let err = builder
            .register(StubConverter {
                label: "second",
                game: STUB_GAME,
            })
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("'second'"));
        assert!(err.to_string().contains("'first'"));
    }

    #[test]
    fn test_from_table_first_wins() {
        let registry = ConverterRegistry::from_table(vec![
            Box::new(StubConverter {
                label: "first",
                game: STUB_GAME,
            }),
            Box::new(StubConverter {
                label: "second",
                game: STUB_GAME,
            }),
            Box::new(StubConverter {
                label: "other",
                game: OTHER_GAME,
            }),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&STUB_GAME).unwrap().name(), "first");
        assert_eq!(registry.get(&OTHER_GAME).unwrap().name(), "other");
    }

    #[test]
    fn test_dispatch_to_registered_converter() {
        let engine = engine();
        let game = game(STUB_GAME);

        let deck = engine.convert_file(Path::new("deck.txt"), &game).unwrap();
        assert_eq!(deck.name, "stub");
        assert_eq!(deck.sections[0].cards[0].name, "deck.txt");

        let deck = engine.convert_text(&HashMap::new(), &game).unwrap();
        assert_eq!(deck.name, "stub");
    }

    #[test]
    fn test_default_url_conversion_unsupported() {
        let engine = engine();
        let err = engine
            .convert_url("https://example.com/deck", &game(STUB_GAME))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { operation: "URL", .. }));
    }

    #[test]
    fn test_file_and_url_strict_without_converter() {
        let engine = engine();
        let game = game(OTHER_GAME);

        let err = engine
            .convert_file(&PathBuf::from("deck.txt"), &game)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { operation: "file", .. }));

        let err = engine.convert_url("https://example.com", &game).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { operation: "URL", .. }));
    }

    #[test]
    fn test_text_falls_back_to_generic_parser() {
        let engine = engine();
        let game = game(OTHER_GAME);
        let sections: HashMap<String, String> = [
            ("Main".to_string(), "4 Lightning Bolt\n// NAME: Burn".to_string()),
            ("Sideboard".to_string(), "Shock x2".to_string()),
        ]
        .into_iter()
        .collect();

        let via_engine = engine.convert_text(&sections, &game).unwrap();
        let direct = parse_sections(&sections, &game.sections, &game.sets, "Imported Deck").unwrap();
        assert_eq!(via_engine, direct);
        assert_eq!(via_engine.name, "Burn");
    }

    #[test]
    fn test_custom_default_name() {
        let engine = engine();
        let game = game(OTHER_GAME);
        let ctx = engine.context(&game).with_default_name("Pasted");
        let deck = engine.convert_text_with(&HashMap::new(), &ctx).unwrap();
        assert_eq!(deck.name, "Pasted");
        assert!(deck.success);
    }

    #[test]
    fn test_global_engine_initialized_once() {
        let first = ConversionEngine::global() as *const ConversionEngine;
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| ConversionEngine::global() as *const _ as usize))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), first as usize);
        }
        assert!(!ConversionEngine::global().registry().is_empty());
    }
}
