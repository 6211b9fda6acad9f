//! Finnish / English strings and the language preference slot.

use std::{fmt, str::FromStr};

use log::warn;

use crate::{
    db::{SlotStorage, LANGUAGE_KEY},
    models::{CollectorRole, ParseError},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Lang {
    Fi,
    #[default]
    En,
}

impl Lang {
    pub fn code(&self) -> &'static str {
        match self {
            Lang::Fi => "fi",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fi" => Ok(Lang::Fi),
            "en" => Ok(Lang::En),
            other => Err(ParseError::UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    AppTitle,
    HomeNoMatches,
    HomeUpdated,
    HomeCollector,
    MatchNotFound,
    SummaryTotal,
    ToastSaved,
    ToastCreated,
    ToastCopied,
    ToastCopyFailed,
    ToastShared,
    ToastExported,
    ToastImportInvalid,
    ToastImportDone,
    ToastImportFailed,
    ConfirmDelete,
    ConfirmReplaceAll,
    ConfirmResetSection,
    LabelByPass,
    LabelByCarry,
    LabelOnTarget,
    LabelOffTarget,
    RolePassing,
    RoleAttackThird,
    RoleBoxEntry,
    RoleShots,
    ShareHalf1,
    ShareHalf2,
    ShareTotal,
    ShareNotes,
    SharePassingOwn,
    SharePassingOpp,
    ShareAttackThird,
    ShareBoxEntry,
    ShareShotsUs,
    ShareShotsOpp,
}

pub fn t(lang: Lang, key: Key) -> &'static str {
    match lang {
        Lang::Fi => fi(key),
        Lang::En => en(key),
    }
}

/// Like [`t`], replacing every `{name}` with its value.
pub fn t_with(lang: Lang, key: Key, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(t(lang, key).to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
}

pub fn role_label(lang: Lang, role: CollectorRole) -> &'static str {
    let key = match role {
        CollectorRole::Passing => Key::RolePassing,
        CollectorRole::AttackThird => Key::RoleAttackThird,
        CollectorRole::BoxEntry => Key::RoleBoxEntry,
        CollectorRole::Shots => Key::RoleShots,
    };
    t(lang, key)
}

fn fi(key: Key) -> &'static str {
    match key {
        Key::AppTitle => "Otteluseuranta",
        Key::HomeNoMatches => "Ei tallennettuja otteluita vielä.",
        Key::HomeUpdated => "Päivitetty",
        Key::HomeCollector => "Kerääjä",
        Key::MatchNotFound => "Ottelua ei löytynyt.",
        Key::SummaryTotal => "Yhteensä",
        Key::ToastSaved => "Tallennettu",
        Key::ToastCreated => "Ottelu luotu",
        Key::ToastCopied => "Kopioitu leikepöydälle",
        Key::ToastCopyFailed => "Kopiointi epäonnistui",
        Key::ToastShared => "Jaettu",
        Key::ToastExported => "Kaikki ottelut ladattu",
        Key::ToastImportInvalid => "Virheellinen JSON-tiedosto",
        Key::ToastImportDone => "Tuonti valmis",
        Key::ToastImportFailed => "Tuonti epäonnistui",
        Key::ConfirmDelete => "Poistetaanko ottelu {home} – {away}?",
        Key::ConfirmReplaceAll => "Korvataanko kaikki nykyiset ottelut?",
        Key::ConfirmResetSection => "Nollataanko osio \"{title}\"?",
        Key::LabelByPass => "Syöttämällä",
        Key::LabelByCarry => "Kuljettamalla",
        Key::LabelOnTarget => "Kohti",
        Key::LabelOffTarget => "Ohi",
        Key::RolePassing => "Syöttöpeli",
        Key::RoleAttackThird => "Hyökkäyskolmannekselle pääsy",
        Key::RoleBoxEntry => "Boxiin pääsy",
        Key::RoleShots => "Laukaukset",
        Key::ShareHalf1 => "1PA",
        Key::ShareHalf2 => "2PA",
        Key::ShareTotal => "Yhteensä",
        Key::ShareNotes => "Muistiinpanot",
        Key::SharePassingOwn => "Syöttöpeli oma",
        Key::SharePassingOpp => "Syöttöpeli vast",
        Key::ShareAttackThird => "Hyökkäyskolmannes",
        Key::ShareBoxEntry => "Boxiin",
        Key::ShareShotsUs => "Laukaukset me",
        Key::ShareShotsOpp => "Laukaukset vast",
    }
}

fn en(key: Key) -> &'static str {
    match key {
        Key::AppTitle => "Match Tracker",
        Key::HomeNoMatches => "No saved matches yet.",
        Key::HomeUpdated => "Updated",
        Key::HomeCollector => "Collector",
        Key::MatchNotFound => "Match not found.",
        Key::SummaryTotal => "Total",
        Key::ToastSaved => "Saved",
        Key::ToastCreated => "Match created",
        Key::ToastCopied => "Copied to clipboard",
        Key::ToastCopyFailed => "Copy failed",
        Key::ToastShared => "Shared",
        Key::ToastExported => "All matches exported",
        Key::ToastImportInvalid => "Invalid JSON file",
        Key::ToastImportDone => "Import complete",
        Key::ToastImportFailed => "Import failed",
        Key::ConfirmDelete => "Delete match {home} – {away}?",
        Key::ConfirmReplaceAll => "Replace all existing matches?",
        Key::ConfirmResetSection => "Reset section \"{title}\"?",
        Key::LabelByPass => "By passing",
        Key::LabelByCarry => "By carrying",
        Key::LabelOnTarget => "On target",
        Key::LabelOffTarget => "Off target",
        Key::RolePassing => "Passing",
        Key::RoleAttackThird => "Final third entries",
        Key::RoleBoxEntry => "Box entries",
        Key::RoleShots => "Shots",
        Key::ShareHalf1 => "1H",
        Key::ShareHalf2 => "2H",
        Key::ShareTotal => "Total",
        Key::ShareNotes => "Notes",
        Key::SharePassingOwn => "Passing own",
        Key::SharePassingOpp => "Passing opp",
        Key::ShareAttackThird => "Final third",
        Key::ShareBoxEntry => "Box entries",
        Key::ShareShotsUs => "Shots us",
        Key::ShareShotsOpp => "Shots opp",
    }
}

/// Stored preference, then the system locale, then English.
pub fn resolve_language(storage: &dyn SlotStorage) -> Lang {
    match storage.read(LANGUAGE_KEY) {
        Ok(Some(stored)) => {
            if let Ok(lang) = stored.trim().parse() {
                return lang;
            }
        }
        Ok(None) => {}
        Err(err) => warn!("Failed to read language preference: {err:#}"),
    }
    lang_from_locale(system_locale().as_deref())
}

pub fn store_language(storage: &dyn SlotStorage, lang: Lang) -> anyhow::Result<()> {
    storage.write(LANGUAGE_KEY, lang.code())
}

fn system_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
}

fn lang_from_locale(locale: Option<&str>) -> Lang {
    match locale {
        Some(value) if value.to_ascii_lowercase().starts_with("fi") => Lang::Fi,
        _ => Lang::En,
    }
}
