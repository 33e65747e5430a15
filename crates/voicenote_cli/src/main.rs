//! Command-line host for the VoiceNote core.
//!
//! # Responsibility
//! - Drive the note store and capture surface from terminal commands.
//! - Print notes to stdout and user notices to stderr.

use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use voicenote_core::db::{open_db, open_db_in_memory};
use voicenote_core::logging::init_logging_from_config;
use voicenote_core::{
    CaptureSurface, CoreConfig, Note, NoteCollectionRepository, NoteId, NoteStore, NoticeKind,
    Notifier, SqliteKeyValueStore, UnavailableRecognizer,
};

#[derive(Debug, Parser)]
#[command(name = "voicenote", version, about = "Create, search and delete notes")]
struct Cli {
    /// SQLite file holding the note slot [default: voicenote.db].
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Keep notes in memory only; nothing is saved when the command ends.
    #[arg(long, global = true, conflicts_with = "db")]
    in_memory: bool,
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save a typed note.
    Add { text: String },
    /// List notes, newest first.
    List,
    /// List notes containing QUERY, ignoring case.
    Search { query: String },
    /// Delete a note by id.
    Delete { id: NoteId },
    /// Try to start voice capture.
    Record,
    /// Print core health-check reply.
    Ping,
}

impl Command {
    /// Log label; never includes note text or queries.
    fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::List => "list",
            Self::Search { .. } => "search",
            Self::Delete { .. } => "delete",
            Self::Record => "record",
            Self::Ping => "ping",
        }
    }
}

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        eprintln!("[{}] {message}", kind.as_str());
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match cli.config.as_ref() {
        Some(path) => CoreConfig::load_from_path(path)?,
        None => CoreConfig::default(),
    };
    if cli.in_memory {
        config.db_path = None;
    } else if cli.db.is_some() {
        config.db_path = cli.db;
    }
    if cli.log_dir.is_some() {
        config.log_dir = cli.log_dir;
    }
    init_logging_from_config(&config)?;

    if let Command::Ping = cli.command {
        println!("voicenote_core ping={}", voicenote_core::ping());
        println!("voicenote_core version={}", voicenote_core::core_version());
        return Ok(());
    }

    let conn = match config.db_path.as_ref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = NoteCollectionRepository::with_key(
        SqliteKeyValueStore::try_new(&conn)?,
        config.storage_key.clone(),
    );
    let mut store = NoteStore::initialize(repo, TerminalNotifier, config.corrupt_slot_policy)?;
    if let Some(diagnostic) = store.load_diagnostic() {
        eprintln!("warning: stored notes were unreadable and have been reset: {diagnostic}");
    }
    let mut surface = CaptureSurface::new(
        UnavailableRecognizer,
        TerminalNotifier,
        config.speech.clone(),
    );

    info!("event=cli_command module=cli command={}", cli.command.name());
    match cli.command {
        Command::Add { text } => {
            surface.choose_text()?;
            surface.edit_draft(text);
            let note = surface.submit(&mut store)?;
            print_note(&note);
        }
        Command::List => store.notes().iter().for_each(print_note),
        Command::Search { query } => store.search(&query).into_iter().for_each(print_note),
        Command::Delete { id } => {
            if !store.delete(&id) {
                eprintln!("warning: no note with id {id}");
            }
        }
        Command::Record => {
            // No terminal speech backend; fails with `CapabilityUnavailable`.
            surface.choose_voice()?;
        }
        Command::Ping => {}
    }

    if let Some(err) = store.last_write_error() {
        return Err(format!("notes were not saved: {err}").into());
    }
    Ok(())
}

fn print_note(note: &Note) {
    println!(
        "{}  {}  {}",
        note.id,
        note.created_at.format("%Y-%m-%d %H:%M"),
        note.content
    );
}
