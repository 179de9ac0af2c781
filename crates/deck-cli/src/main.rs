//! Deck Converter CLI
//!
//! Command-line tool for converting pasted, local or remote deck lists into
//! structured decks.

use clap::{Parser, Subcommand};
use deck_core::converters::MtgConverter;
use deck_core::{
    scan_deck_files, ConversionEngine, Deck, GameDescriptor, GameId, DEFAULT_DECK_NAME,
};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "deck-cli")]
#[command(about = "Trading card game deck converter", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert pasted deck text, one file per section
    ConvertText {
        /// Game descriptor JSON file, or "mtg" for the built-in descriptor
        #[arg(short, long)]
        game: String,

        /// Section text as NAME=FILE ("-" reads stdin)
        #[arg(short, long, required = true, value_parser = parse_section_arg)]
        section: Vec<(String, PathBuf)>,

        /// Placeholder deck name
        #[arg(long, default_value = DEFAULT_DECK_NAME)]
        name: String,

        /// Print the deck as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a deck file with the game's converter
    ConvertFile {
        /// Game descriptor JSON file, or "mtg"
        #[arg(short, long)]
        game: String,

        /// Deck file
        #[arg(short, long)]
        file: PathBuf,

        /// Print the deck as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download and convert a deck page
    ConvertUrl {
        /// Game descriptor JSON file, or "mtg"
        #[arg(short, long)]
        game: String,

        /// Deck URL
        #[arg(short, long)]
        url: String,

        /// Print the deck as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert every deck file under one or more directories
    ConvertDir {
        /// Game descriptor JSON file, or "mtg"
        #[arg(short, long)]
        game: String,

        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// Write one JSON deck per input file into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered converters
    Converters,

    /// Create a game descriptor template
    CreateGame {
        /// Output path for the descriptor
        #[arg(short, long)]
        output: PathBuf,

        /// Game name
        #[arg(short, long)]
        name: String,

        /// Deck sections, in order
        #[arg(short, long, default_values_t = vec!["Main".to_string(), "Sideboard".to_string()])]
        section: Vec<String>,

        /// Game id (random if omitted)
        #[arg(long)]
        id: Option<GameId>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info,deck_core=debug",
        _ => "debug,deck_core=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> deck_core::Result<()> {
    let engine = ConversionEngine::global();

    match cli.command {
        Commands::ConvertText {
            game,
            section,
            name,
            json,
        } => cmd_convert_text(engine, &game, &section, &name, json),
        Commands::ConvertFile { game, file, json } => {
            let game = load_game(&game)?;
            let deck = engine.convert_file(&file, &game)?;
            print_deck(&deck, json)
        }
        Commands::ConvertUrl { game, url, json } => {
            let game = load_game(&game)?;
            let deck = engine.convert_url(&url, &game)?;
            print_deck(&deck, json)
        }
        Commands::ConvertDir { game, root, output } => {
            cmd_convert_dir(engine, &game, &root, output.as_deref())
        }
        Commands::Converters => cmd_converters(engine),
        Commands::CreateGame {
            output,
            name,
            section,
            id,
        } => cmd_create_game(&output, &name, section, id),
    }
}

fn parse_section_arg(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((name, file)) if !name.trim().is_empty() && !file.is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(file)))
        }
        _ => Err(format!("expected NAME=FILE, got '{}'", arg)),
    }
}

/// Load a descriptor file, or the built-in MTG descriptor for "mtg"
fn load_game(game: &str) -> deck_core::Result<GameDescriptor> {
    if game.eq_ignore_ascii_case("mtg") {
        return Ok(MtgConverter::descriptor());
    }
    GameDescriptor::load(game)
}

fn read_input(path: &Path) -> deck_core::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|e| deck_core::Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn cmd_convert_text(
    engine: &ConversionEngine,
    game: &str,
    sections: &[(String, PathBuf)],
    default_name: &str,
    json: bool,
) -> deck_core::Result<()> {
    let game = load_game(game)?;

    let mut texts: HashMap<String, String> = HashMap::new();
    for (name, path) in sections {
        let text = read_input(path)?;
        let entry = texts.entry(name.clone()).or_default();
        if !entry.is_empty() {
            entry.push('\n');
        }
        entry.push_str(&text);
    }

    let ctx = engine.context(&game).with_default_name(default_name);
    let deck = engine.convert_text_with(&texts, &ctx)?;
    print_deck(&deck, json)
}

fn cmd_convert_dir(
    engine: &ConversionEngine,
    game: &str,
    roots: &[PathBuf],
    output: Option<&Path>,
) -> deck_core::Result<()> {
    let game = load_game(game)?;
    let converter = engine
        .registry()
        .get(&game.id)
        .ok_or_else(|| deck_core::Error::UnsupportedOperation {
            operation: "file",
            game: game.name.clone(),
        })?;

    let scan = scan_deck_files(roots, converter.file_extensions())?;
    println!("Found {} deck files", scan.total_files());

    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let mut converted = 0;
    let mut errors = Vec::new();
    let mut written = HashSet::new();

    for path in &scan.files {
        // Two roots can hold the same relative path
        let target = output.map(|dir| output_path(dir, &scan.roots, path));
        if let Some(target) = &target {
            if !written.insert(target.clone()) {
                let message = format!("output {} already written by another deck", target.display());
                warn!(path = %path.display(), "{}", message);
                errors.push((path.clone(), message));
                continue;
            }
        }

        let deck = match engine.convert_file(path, &game) {
            Ok(deck) => deck,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to convert deck file");
                errors.push((path.clone(), e.to_string()));
                continue;
            }
        };

        println!(
            "  {} -> '{}' ({} cards)",
            path.display(),
            deck.name,
            deck.total_cards()
        );

        if let Some(target) = &target {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, serde_json::to_string_pretty(&deck)?)?;
        }
        converted += 1;
    }

    println!();
    println!("Converted {} of {} files", converted, scan.total_files());

    if !errors.is_empty() {
        println!("\nErrors ({}):", errors.len());
        for (path, err) in &errors {
            println!("  {}: {}", path.display(), err);
        }
    }

    Ok(())
}

/// Mirror `file` under `dir`, relative to the root it was found in, with
/// `.json` appended so `burn.txt` and `burn.dec` stay distinct
fn output_path(dir: &Path, roots: &[PathBuf], file: &Path) -> PathBuf {
    let relative = roots
        .iter()
        .find_map(|root| file.strip_prefix(root).ok())
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| file.file_name().map_or(file, Path::new));

    let mut name = OsString::from(relative.as_os_str());
    name.push(".json");
    dir.join(name)
}

fn cmd_converters(engine: &ConversionEngine) -> deck_core::Result<()> {
    let registry = engine.registry();
    println!("Converters ({}):", registry.len());
    for converter in registry.iter() {
        println!(
            "  {} [{}] files: {}",
            converter.name(),
            converter.game_id(),
            converter.file_extensions().join(", ")
        );
    }
    Ok(())
}

fn cmd_create_game(
    output: &Path,
    name: &str,
    sections: Vec<String>,
    id: Option<GameId>,
) -> deck_core::Result<()> {
    let game = GameDescriptor::new(id.unwrap_or_else(GameId::new_random), name, sections);
    game.save(output)?;

    println!("Created game descriptor: {}", output.display());
    println!("Game: {} [{}]", game.name, game.id);
    println!("Sections: {}", game.sections.join(", "));
    println!();
    println!("Add card sets to the file, then run:");
    println!(
        "  deck-cli convert-text --game {} --section {}=deck.txt",
        output.display(),
        game.sections.first().map(String::as_str).unwrap_or("Main")
    );

    Ok(())
}

fn print_deck(deck: &Deck, json: bool) -> deck_core::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(deck)?);
        return Ok(());
    }

    println!("Deck: {}", deck.name);
    println!("Cards: {}", deck.total_cards());

    for section in &deck.sections {
        println!();
        println!("{} ({})", section.name, section.total_cards());
        println!("{}", "-".repeat(40));
        for card in &section.cards {
            let set = if card.set_hint.is_empty() {
                String::new()
            } else {
                format!(" [{}]", card.set_hint)
            };
            let matched = if card.candidates.is_empty() { "" } else { " *" };
            println!("{:>4} {}{}{}", card.quantity, card.name, set, matched);
        }
    }

    Ok(())
}
