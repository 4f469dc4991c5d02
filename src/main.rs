//! Terminal front end for the clickable-word reader.
//!
//! - Parse command-line arguments (or reopen the last book).
//! - Load user configuration from `conf/config.toml`.
//! - Run a line-oriented command loop over a `ReaderSession`.

use anyhow::{Context, Result, anyhow, bail};
use ebup_gloss::cache::BookCache;
use ebup_gloss::config::{AppConfig, load_config};
use ebup_gloss::reader::{ClickOutcome, ReaderSession, VOICE_TEST_PHRASE, WordCard};
use ebup_gloss::settings::SettingKey;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const HELP: &str = "\
commands:
  show              print the current section
  words             list clickable words with their numbers
  click <n>         click word number <n>
  tap               click outside any word (turns the page)
  next | prev       move one section
  goto <n>          jump to section <n> (1-based)
  set <key> <value> change a setting (font-size, line-height, font-family,
                    voice-name, voice-rate)
  settings          print the current settings
  voices            list available voices
  say [text]        read text aloud (a test phrase when empty)
  stop              stop speaking
  help              show this list
  quit              leave the reader";

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());

    let book_path = parse_args(&config)?;
    info!(
        path = %book_path.display(),
        level = %config.log_level,
        target_language = %config.translation_target_language,
        "Starting reader"
    );

    let mut session = ReaderSession::open(&book_path, &config)
        .with_context(|| format!("Failed to open {}", book_path.display()))?;
    println!(
        "{} ({} sections). Type `help` for commands.",
        session.title(),
        session.section_count()
    );
    print_location(&session);
    if let Some(unit) = session.resume_unit() {
        println!("Last looked-up word: #{unit}");
    }

    command_loop(&mut session)
}

fn parse_args(config: &AppConfig) -> Result<PathBuf> {
    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(arg) => PathBuf::from(arg),
        None => BookCache::new(&config.cache_dir)
            .load_last_book()
            .ok_or_else(|| anyhow!("Usage: ebup-gloss <path-to-book>"))?,
    };

    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.as_path().display()));
    }
    Ok(path)
}

fn command_loop(session: &mut ReaderSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match execute(session, input) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                warn!("{err:#}");
                println!("error: {err:#}");
            }
        }
    }
    session.stop_speech();
    Ok(())
}

/// Run one command. Returns `false` when the session should end.
fn execute(session: &mut ReaderSession, input: &str) -> Result<bool> {
    let (command, rest) = input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(cmd, rest)| (cmd, rest.trim()));

    match command {
        "quit" | "exit" | "q" => return Ok(false),
        "help" | "?" => println!("{HELP}"),
        "show" => {
            print_location(session);
            println!("{}", session.text());
        }
        "words" => {
            for (n, word) in session.words().iter().enumerate() {
                println!("{n:>5}  {word}");
            }
        }
        "click" => {
            let ordinal = parse_number(rest, "click <n>")?;
            let outcome = session.click_unit(ordinal)?;
            print_outcome(session, outcome);
        }
        "tap" => {
            let outcome = session.tap()?;
            print_outcome(session, outcome);
        }
        "next" => match session.next()? {
            Some(_) => print_location(session),
            None => println!("Already at the last section."),
        },
        "prev" => match session.prev()? {
            Some(_) => print_location(session),
            None => println!("Already at the first section."),
        },
        "goto" => {
            let number = parse_number(rest, "goto <n>")?;
            if number == 0 || number > session.section_count() {
                bail!("Section must be between 1 and {}", session.section_count());
            }
            session.display(number - 1)?;
            print_location(session);
        }
        "set" => {
            let (key, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("Usage: set <key> <value>"))?;
            let key: SettingKey = key.parse()?;
            session.set_setting(key, value.trim())?;
            println!("{key} = {}", session.settings().value_of(key));
        }
        "settings" => {
            for key in SettingKey::ALL {
                println!("{key:<12} {}", session.settings().value_of(key));
            }
        }
        "voices" => {
            let current = session.settings().voice_name.clone();
            for voice in session.voices() {
                let marker = if voice == current { "*" } else { " " };
                println!("{marker} {voice}");
            }
        }
        "say" => {
            let text = if rest.is_empty() { VOICE_TEST_PHRASE } else { rest };
            if session.speak(text).is_none() {
                println!("Speech is unavailable; see the log for details.");
            }
        }
        "stop" => session.stop_speech(),
        other => bail!("Unknown command `{other}` (try `help`)"),
    }
    Ok(true)
}

fn parse_number(raw: &str, usage: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| anyhow!("Usage: {usage} (got `{raw}`)"))
}

fn print_location(session: &ReaderSession) {
    if let Some(index) = session.current_section() {
        println!(
            "[{}] section {}/{}",
            session.title(),
            index + 1,
            session.section_count()
        );
    }
}

fn print_outcome(session: &ReaderSession, outcome: ClickOutcome) {
    match outcome {
        ClickOutcome::Word(card) => print_card(&card),
        ClickOutcome::PageTurned(_) => print_location(session),
        ClickOutcome::Ignored => println!("Nothing to do here."),
    }
}

fn print_card(card: &WordCard) {
    let source = if card.local { " (dictionary)" } else { "" };
    println!("{}{source}", card.word);
    println!("  {}", card.meaning);
    println!("  {}", card.sentence);
    println!("  {}", card.sentence_translation);
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        info!("RUST_LOG is set; ignoring config log level");
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
