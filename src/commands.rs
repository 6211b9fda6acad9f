//! User-facing actions built on top of the store.
//!
//! Each function does what one button or menu entry does: ask for
//! confirmation where a change is destructive, run the store operation and
//! report the outcome as a toast.

use std::path::Path;

use anyhow::{anyhow, Result};

use crate::{
    export::{self, ExportFile, ExportFormat},
    i18n::{role_label, t, t_with, Key},
    log_info, log_warn,
    models::{timestamp_now, Half, MatchMeta},
    notify::ToastKind,
    store::{parse_import, ImportError, ImportMode, Section},
    App,
};

const ENABLE_LOGS: bool = true;

/// Yes/no question put to the user before a destructive change.
pub trait Prompt {
    fn confirm(&self, message: &str) -> bool;
}

pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Platform share dialog.
pub trait ShareSheet {
    fn is_available(&self) -> bool;
    fn share(&self, text: &str) -> Result<()>;
}

#[derive(Debug)]
pub enum ImportOutcome {
    Imported { count: usize, mode: ImportMode },
    /// The input was readable but did not hold a valid match list.
    Rejected(ImportError),
    /// The input could not be read or parsed.
    Failed,
}

/// Creates a match from the form values. An empty date means now.
pub fn create_match(app: &App, mut meta: MatchMeta) -> String {
    if meta.date_time.trim().is_empty() {
        meta.date_time = timestamp_now();
    }
    let id = app.store.create_match(meta);
    app.toast(Key::ToastCreated, ToastKind::Success);
    id
}

/// Returns whether the match was deleted.
pub fn delete_match(app: &App, id: &str, prompt: &dyn Prompt) -> bool {
    let Some(record) = app.store.find(id) else {
        return false;
    };
    let question = t_with(
        app.lang,
        Key::ConfirmDelete,
        &[
            ("home", &record.meta.home_team),
            ("away", &record.meta.away_team),
        ],
    );
    if !prompt.confirm(&question) {
        return false;
    }
    app.store.delete_match(id);
    true
}

/// Returns whether the section was reset.
pub fn reset_section(
    app: &App,
    id: &str,
    half: Half,
    section: Section,
    prompt: &dyn Prompt,
) -> bool {
    if app.store.find(id).is_none() {
        return false;
    }
    let title = role_label(app.lang, section.role());
    let question = t_with(app.lang, Key::ConfirmResetSection, &[("title", title)]);
    if !prompt.confirm(&question) {
        return false;
    }
    app.store.reset_section(id, half, section);
    true
}

/// Validates `text`, then asks whether to replace everything or merge.
pub fn import_text(app: &App, text: &str, prompt: &dyn Prompt) -> ImportOutcome {
    let matches = match parse_import(text) {
        Ok(matches) => matches,
        Err(err) if err.is_schema_error() => {
            log_warn!("Rejected import: {err}");
            app.toast(Key::ToastImportInvalid, ToastKind::Info);
            return ImportOutcome::Rejected(err);
        }
        Err(err) => {
            log_warn!("Import failed: {err}");
            app.toast(Key::ToastImportFailed, ToastKind::Info);
            return ImportOutcome::Failed;
        }
    };

    let mode = if prompt.confirm(t(app.lang, Key::ConfirmReplaceAll)) {
        ImportMode::Replace
    } else {
        ImportMode::Merge
    };
    let count = matches.len();
    app.store.import_matches(matches, mode);
    app.toast(Key::ToastImportDone, ToastKind::Success);
    ImportOutcome::Imported { count, mode }
}

pub async fn import_file(app: &App, path: &Path, prompt: &dyn Prompt) -> ImportOutcome {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => import_text(app, &text, prompt),
        Err(err) => {
            log_warn!("Could not read import file {}: {err}", path.display());
            app.toast(Key::ToastImportFailed, ToastKind::Info);
            ImportOutcome::Failed
        }
    }
}

pub fn export_all(app: &App) -> Result<ExportFile> {
    let file = export::all_matches_file(&app.store.snapshot())?;
    app.toast(Key::ToastExported, ToastKind::Success);
    Ok(file)
}

pub fn export_match(app: &App, id: &str, format: ExportFormat) -> Result<ExportFile> {
    let record = app
        .store
        .find(id)
        .ok_or_else(|| anyhow!("no match with id {id}"))?;
    export::match_file(&record, format, app.lang)
}

/// Returns whether the text reached the clipboard.
pub fn copy_share_text(app: &App, id: &str, clipboard: &dyn Clipboard) -> Result<bool> {
    let text = share_text_for(app, id)?;
    Ok(copy(app, &text, clipboard))
}

/// Uses the share sheet when there is one, otherwise copies to the clipboard.
pub fn share_match(
    app: &App,
    id: &str,
    sheet: &dyn ShareSheet,
    clipboard: &dyn Clipboard,
) -> Result<bool> {
    let text = share_text_for(app, id)?;
    if sheet.is_available() {
        match sheet.share(&text) {
            Ok(()) => {
                app.toast(Key::ToastShared, ToastKind::Success);
                return Ok(true);
            }
            Err(err) => log_info!("Share sheet failed, copying instead: {err:#}"),
        }
    }
    Ok(copy(app, &text, clipboard))
}

fn share_text_for(app: &App, id: &str) -> Result<String> {
    let record = app
        .store
        .find(id)
        .ok_or_else(|| anyhow!("no match with id {id}"))?;
    Ok(export::share_text(&record, app.lang))
}

fn copy(app: &App, text: &str, clipboard: &dyn Clipboard) -> bool {
    match clipboard.write_text(text) {
        Ok(()) => {
            app.toast(Key::ToastCopied, ToastKind::Success);
            true
        }
        Err(err) => {
            log_warn!("Clipboard write failed: {err:#}");
            app.toast(Key::ToastCopyFailed, ToastKind::Info);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        sync::{Arc, Mutex},
        time::Duration,
    };

    use super::*;
    use crate::{
        db::MemorySlots,
        i18n::Lang,
        notify::Notifier,
        settings::TrackerSettings,
        store::CounterPath,
    };

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Recorder {
        fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, message: &str, _kind: ToastKind) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    struct Answer {
        yes: bool,
        asked: RefCell<Vec<String>>,
    }

    impl Answer {
        fn new(yes: bool) -> Self {
            Self {
                yes,
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl Prompt for Answer {
        fn confirm(&self, message: &str) -> bool {
            self.asked.borrow_mut().push(message.to_string());
            self.yes
        }
    }

    #[derive(Default)]
    struct FakeClipboard {
        broken: bool,
        text: RefCell<Option<String>>,
    }

    impl Clipboard for FakeClipboard {
        fn write_text(&self, text: &str) -> Result<()> {
            if self.broken {
                return Err(anyhow!("clipboard denied"));
            }
            *self.text.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    struct FakeSheet {
        available: bool,
        fails: bool,
    }

    impl ShareSheet for FakeSheet {
        fn is_available(&self) -> bool {
            self.available
        }

        fn share(&self, _text: &str) -> Result<()> {
            if self.fails {
                Err(anyhow!("dismissed"))
            } else {
                Ok(())
            }
        }
    }

    fn app() -> (App, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let app = App::with_storage(
            Arc::new(MemorySlots::with_value(crate::db::LANGUAGE_KEY, "en")),
            recorder.clone(),
            &TrackerSettings::default(),
        );
        (app, recorder)
    }

    fn meta(home: &str, away: &str) -> MatchMeta {
        MatchMeta {
            home_team: home.into(),
            away_team: away.into(),
            ..MatchMeta::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn create_fills_in_date_and_toasts() {
        let (app, recorder) = app();
        assert_eq!(app.lang, Lang::En);
        let id = create_match(&app, meta("HJK", "KuPS"));

        let record = app.store.find(&id).unwrap();
        assert!(!record.meta.date_time.is_empty());
        assert_eq!(recorder.messages(), vec!["Match created"]);
    }

    #[tokio::test(start_paused = true)]
    async fn declined_delete_keeps_the_match() {
        let (app, _) = app();
        let id = create_match(&app, meta("HJK", "KuPS"));
        let prompt = Answer::new(false);

        assert!(!delete_match(&app, &id, &prompt));
        assert!(app.store.find(&id).is_some());
        assert_eq!(*prompt.asked.borrow(), vec!["Delete match HJK – KuPS?"]);

        assert!(delete_match(&app, &id, &Answer::new(true)));
        assert!(app.store.find(&id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn declined_reset_keeps_counters() {
        let (app, _) = app();
        let id = create_match(&app, meta("A", "B"));
        app.store
            .update_counter(&id, Half::First, CounterPath::ShotsUsOn, 3);
        let prompt = Answer::new(false);

        assert!(!reset_section(&app, &id, Half::First, Section::Shots, &prompt));
        assert_eq!(app.store.find(&id).unwrap().stats.first.shots.us.on, 3);
        assert_eq!(*prompt.asked.borrow(), vec!["Reset section \"Shots\"?"]);

        assert!(reset_section(&app, &id, Half::First, Section::Shots, &Answer::new(true)));
        assert_eq!(app.store.find(&id).unwrap().stats.first.shots.us.on, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn import_reports_syntax_and_schema_failures() {
        let (app, recorder) = app();
        let prompt = Answer::new(true);

        assert!(matches!(import_text(&app, "{not json", &prompt), ImportOutcome::Failed));
        assert!(matches!(
            import_text(&app, r#"{"matches": []}"#, &prompt),
            ImportOutcome::Rejected(ImportError::NotAnArray)
        ));
        assert!(prompt.asked.borrow().is_empty());
        assert_eq!(recorder.messages(), vec!["Import failed", "Invalid JSON file"]);
        assert!(app.store.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn import_answer_picks_the_mode() {
        let (app, recorder) = app();
        let kept = create_match(&app, meta("Kept", "Side"));
        let incoming = export::all_matches_json(&crate::store::AppState::new(vec![
            crate::models::Match::new(meta("New", "Side")),
        ]))
        .unwrap();

        let outcome = import_text(&app, &incoming, &Answer::new(false));
        assert!(matches!(
            outcome,
            ImportOutcome::Imported { count: 1, mode: ImportMode::Merge }
        ));
        assert_eq!(app.store.snapshot().matches.len(), 2);

        import_text(&app, &incoming, &Answer::new(true));
        let state = app.store.snapshot();
        assert_eq!(state.matches.len(), 1);
        assert!(state.find(&kept).is_none());
        assert_eq!(recorder.messages().last().unwrap(), "Import complete");
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_import_file_fails() {
        let (app, recorder) = app();
        let dir = tempfile::tempdir().unwrap();
        let outcome = import_file(&app, &dir.path().join("missing.json"), &Answer::new(true)).await;

        assert!(matches!(outcome, ImportOutcome::Failed));
        assert_eq!(recorder.messages(), vec!["Import failed"]);
    }

    #[tokio::test(start_paused = true)]
    async fn share_falls_back_to_clipboard() {
        let (app, recorder) = app();
        let id = create_match(&app, meta("HJK", "KuPS"));
        let clipboard = FakeClipboard::default();

        let unavailable = FakeSheet { available: false, fails: false };
        assert!(share_match(&app, &id, &unavailable, &clipboard).unwrap());
        assert!(clipboard.text.borrow().as_deref().unwrap().starts_with("HJK – KuPS"));

        let failing = FakeSheet { available: true, fails: true };
        assert!(share_match(&app, &id, &failing, &clipboard).unwrap());

        let working = FakeSheet { available: true, fails: false };
        assert!(share_match(&app, &id, &working, &clipboard).unwrap());

        assert_eq!(
            recorder.messages(),
            vec!["Match created", "Copied to clipboard", "Copied to clipboard", "Shared"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn copy_failure_is_reported() {
        let (app, recorder) = app();
        let id = create_match(&app, meta("HJK", "KuPS"));
        let clipboard = FakeClipboard { broken: true, ..FakeClipboard::default() };

        assert!(!copy_share_text(&app, &id, &clipboard).unwrap());
        assert_eq!(recorder.messages().last().unwrap(), "Copy failed");
        assert!(copy_share_text(&app, "missing", &clipboard).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn export_all_toasts() {
        let (app, recorder) = app();
        create_match(&app, meta("HJK", "KuPS"));
        let file = export_all(&app).unwrap();

        assert_eq!(file.filename, "ottelut.json");
        assert_eq!(recorder.messages().last().unwrap(), "All matches exported");
    }

    #[tokio::test(start_paused = true)]
    async fn toasts_clear_after_the_configured_ttl() {
        let recorder = Arc::new(Recorder::default());
        let settings = TrackerSettings {
            toast_ttl_ms: 900,
            ..TrackerSettings::default()
        };
        let app = App::with_storage(Arc::new(MemorySlots::new()), recorder.clone(), &settings);
        create_match(&app, meta("HJK", "KuPS"));

        let shown = app.toasts.current().unwrap();
        assert_eq!(shown.kind, ToastKind::Success);
        assert_eq!(recorder.messages().len(), 1);

        // The debounced write lands at 200 ms and its toast lives until 1100 ms.
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(app.toasts.current(), None);
        assert_eq!(recorder.messages(), vec!["Match created", "Saved"]);
    }
}
