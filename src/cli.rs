//! Command-line front end.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{self, ImportOutcome, Prompt, ShareSheet},
    export::{write_export, ExportFormat},
    i18n::{role_label, t, Key, Lang},
    models::{CollectorRole, Half, MatchMeta, MetaPatch},
    notify::{Notifier, ToastKind},
    settings::{resolve_data_dir, SettingsStore},
    store::{CounterPath, ImportMode, Section},
    App, SETTINGS_FILE,
};

#[derive(Debug, Parser)]
#[command(name = "match-tracker", version, about = "Per-half football match statistics")]
pub struct Cli {
    /// Where matches and settings are stored.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Answer yes to every confirmation.
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Matches, most recently touched first.
    List,
    /// Create a match.
    New(NewArgs),
    /// Print the summary of one match.
    Show { id: String },
    /// Add a signed delta to one counter.
    Count {
        id: String,
        half: Half,
        path: CounterPath,
        #[arg(allow_hyphen_values = true, default_value_t = 1)]
        delta: i64,
    },
    /// Zero one section of one half.
    Reset {
        id: String,
        half: Half,
        section: Section,
    },
    /// Edit match details.
    Meta(MetaArgs),
    Delete { id: String },
    /// Write every match to ottelut.json.
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Write one match as JSON, CSV or text.
    ExportMatch {
        id: String,
        #[arg(long, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the share text of one match.
    Share { id: String },
    /// Load matches from a JSON export.
    Import {
        file: PathBuf,
        /// Skip the replace-all question.
        #[arg(long)]
        mode: Option<ImportMode>,
    },
    /// Show or set the interface language.
    Lang { lang: Option<Lang> },
    /// Show or change timing settings.
    Settings(SettingsArgs),
}

#[derive(Debug, Args)]
pub struct NewArgs {
    #[arg(long)]
    pub home: String,
    #[arg(long)]
    pub away: String,
    #[arg(long, default_value = "")]
    pub location: String,
    /// Kick-off time; now when omitted.
    #[arg(long, default_value = "")]
    pub date: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    #[arg(long, default_value_t = CollectorRole::Passing)]
    pub role: CollectorRole,
}

#[derive(Debug, Args)]
pub struct MetaArgs {
    pub id: String,
    #[arg(long)]
    pub home: Option<String>,
    #[arg(long)]
    pub away: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub role: Option<CollectorRole>,
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[arg(long)]
    pub save_debounce_ms: Option<u64>,
    #[arg(long)]
    pub saved_toast_throttle_ms: Option<u64>,
    #[arg(long)]
    pub toast_ttl_ms: Option<u64>,
}

/// Toasts go to stderr so stdout stays clean for piping.
struct ConsoleToasts;

impl Notifier for ConsoleToasts {
    fn notify(&self, message: &str, kind: ToastKind) {
        match kind {
            ToastKind::Success => eprintln!("✓ {message}"),
            ToastKind::Info => eprintln!("· {message}"),
        }
    }
}

/// Asks on stdin unless `--yes` was given.
struct StdinPrompt {
    assume_yes: bool,
}

impl Prompt for StdinPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "k" | "kyllä")
    }
}

struct FixedAnswer(bool);

impl Prompt for FixedAnswer {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// The terminal has no share dialog; sharing prints to stdout.
struct StdoutShare;

impl ShareSheet for StdoutShare {
    fn is_available(&self) -> bool {
        true
    }

    fn share(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        Ok(())
    }
}

struct NoClipboard;

impl commands::Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<()> {
        bail!("no clipboard available")
    }
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let mut app = App::open(&data_dir, Arc::new(ConsoleToasts))?;
    let prompt = StdinPrompt {
        assume_yes: cli.yes,
    };

    match cli.command {
        Command::List => list(&app),
        Command::New(args) => {
            let id = commands::create_match(
                &app,
                MatchMeta {
                    date_time: args.date,
                    location: args.location,
                    home_team: args.home,
                    away_team: args.away,
                    notes: args.notes,
                    collector_role: args.role,
                },
            );
            println!("{id}");
        }
        Command::Show { id } => {
            let id = resolve_id(&app, &id)?;
            let record = app.store.find(&id).ok_or_else(|| not_found(&app))?;
            println!("{}", crate::export::share_text(&record, app.lang));
        }
        Command::Count {
            id,
            half,
            path,
            delta,
        } => {
            let id = resolve_id(&app, &id)?;
            app.store.update_counter(&id, half, path, delta);
            if let Some(record) = app.store.find(&id) {
                println!("{half} {path} = {}", path.get(record.stats.half(half)));
            }
        }
        Command::Reset { id, half, section } => {
            let id = resolve_id(&app, &id)?;
            commands::reset_section(&app, &id, half, section, &prompt);
        }
        Command::Meta(args) => {
            let id = resolve_id(&app, &args.id)?;
            let patch = MetaPatch {
                date_time: args.date,
                location: args.location,
                home_team: args.home,
                away_team: args.away,
                notes: args.notes,
                collector_role: args.role,
            };
            if !patch.is_empty() {
                app.store.update_meta(&id, patch);
            }
        }
        Command::Delete { id } => {
            let id = resolve_id(&app, &id)?;
            commands::delete_match(&app, &id, &prompt);
        }
        Command::Export { out } => {
            let file = commands::export_all(&app)?;
            println!("{}", write_export(&out, &file)?.display());
        }
        Command::ExportMatch { id, format, out } => {
            let id = resolve_id(&app, &id)?;
            let file = commands::export_match(&app, &id, format)?;
            println!("{}", write_export(&out, &file)?.display());
        }
        Command::Share { id } => {
            let id = resolve_id(&app, &id)?;
            commands::share_match(&app, &id, &StdoutShare, &NoClipboard)?;
        }
        Command::Import { file, mode } => {
            let outcome = match mode {
                Some(mode) => {
                    let answer = FixedAnswer(mode == ImportMode::Replace);
                    commands::import_file(&app, &file, &answer).await
                }
                None => commands::import_file(&app, &file, &prompt).await,
            };
            match outcome {
                ImportOutcome::Imported { count, mode } => println!("{count} ({mode})"),
                ImportOutcome::Rejected(err) => bail!(err),
                ImportOutcome::Failed => bail!("could not import {}", file.display()),
            }
        }
        Command::Lang { lang } => match lang {
            Some(lang) => app.set_language(lang)?,
            None => println!("{}", app.lang),
        },
        Command::Settings(args) => {
            settings(&SettingsStore::new(data_dir.join(SETTINGS_FILE))?, &args)?
        }
    }

    app.store.flush();
    Ok(())
}

fn list(app: &App) {
    println!("{}", t(app.lang, Key::AppTitle));
    let matches = app.store.recent_matches();
    if matches.is_empty() {
        println!("{}", t(app.lang, Key::HomeNoMatches));
        return;
    }
    for record in matches {
        println!(
            "{}  {}  {} · {}  ({}: {}, {}: {})",
            &record.id[..8.min(record.id.len())],
            record.title(),
            format_date(&record.meta.date_time),
            record.meta.location,
            t(app.lang, Key::HomeCollector),
            role_label(app.lang, record.meta.collector_role),
            t(app.lang, Key::HomeUpdated),
            format_date(record.last_touched()),
        );
    }
}

fn settings(store: &SettingsStore, args: &SettingsArgs) -> Result<()> {
    let mut settings = store.current();
    let before = settings.clone();
    if let Some(ms) = args.save_debounce_ms {
        settings.save_debounce_ms = ms;
    }
    if let Some(ms) = args.saved_toast_throttle_ms {
        settings.saved_toast_throttle_ms = ms;
    }
    if let Some(ms) = args.toast_ttl_ms {
        settings.toast_ttl_ms = ms;
    }
    if settings != before {
        store.update(settings.clone())?;
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

/// Accepts a full id or an unambiguous prefix of one.
fn resolve_id(app: &App, needle: &str) -> Result<String> {
    let state = app.store.snapshot();
    if state.find(needle).is_some() {
        return Ok(needle.to_string());
    }
    let mut candidates = state
        .matches
        .iter()
        .filter(|record| record.id.starts_with(needle));
    match (candidates.next(), candidates.next()) {
        (Some(record), None) => Ok(record.id.clone()),
        (Some(_), Some(_)) => Err(anyhow!("id prefix '{needle}' is ambiguous")),
        (None, _) => Err(not_found(app)),
    }
}

fn not_found(app: &App) -> anyhow::Error {
    anyhow!(t(app.lang, Key::MatchNotFound))
}

/// Local `dd.mm.yyyy hh:mm` for RFC 3339 values, anything else verbatim.
fn format_date(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%d.%m.%Y %H:%M")
            .to_string(),
        Err(_) => value.to_string(),
    }
}
