//! Addressing of the 12 leaf counters inside a [`HalfStats`].
//!
//! The set of leaves is closed: a path that is not listed here cannot be
//! parsed, so an update can never invent a new field.

use std::{fmt, str::FromStr};

use crate::models::{
    CollectorRole, EntryStats, HalfStats, ParseError, PassingStats, ShotStats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterPath {
    PassingOwnAttempts,
    PassingOwnCompleted,
    PassingOppAttempts,
    PassingOppCompleted,
    AttackThirdPass,
    AttackThirdCarry,
    BoxEntryPass,
    BoxEntryCarry,
    ShotsUsOn,
    ShotsUsOff,
    ShotsOppOn,
    ShotsOppOff,
}

impl CounterPath {
    pub const ALL: [CounterPath; 12] = [
        CounterPath::PassingOwnAttempts,
        CounterPath::PassingOwnCompleted,
        CounterPath::PassingOppAttempts,
        CounterPath::PassingOppCompleted,
        CounterPath::AttackThirdPass,
        CounterPath::AttackThirdCarry,
        CounterPath::BoxEntryPass,
        CounterPath::BoxEntryCarry,
        CounterPath::ShotsUsOn,
        CounterPath::ShotsUsOff,
        CounterPath::ShotsOppOn,
        CounterPath::ShotsOppOff,
    ];

    /// Dotted path into the JSON form of a half, e.g. `shots.opp.on`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterPath::PassingOwnAttempts => "passing.ownHalf.attempts",
            CounterPath::PassingOwnCompleted => "passing.ownHalf.completed",
            CounterPath::PassingOppAttempts => "passing.oppHalf.attempts",
            CounterPath::PassingOppCompleted => "passing.oppHalf.completed",
            CounterPath::AttackThirdPass => "attackThird.pass",
            CounterPath::AttackThirdCarry => "attackThird.carry",
            CounterPath::BoxEntryPass => "boxEntry.pass",
            CounterPath::BoxEntryCarry => "boxEntry.carry",
            CounterPath::ShotsUsOn => "shots.us.on",
            CounterPath::ShotsUsOff => "shots.us.off",
            CounterPath::ShotsOppOn => "shots.opp.on",
            CounterPath::ShotsOppOff => "shots.opp.off",
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.as_str().split('.')
    }

    pub fn section(&self) -> Section {
        match self {
            CounterPath::PassingOwnAttempts
            | CounterPath::PassingOwnCompleted
            | CounterPath::PassingOppAttempts
            | CounterPath::PassingOppCompleted => Section::Passing,
            CounterPath::AttackThirdPass | CounterPath::AttackThirdCarry => Section::AttackThird,
            CounterPath::BoxEntryPass | CounterPath::BoxEntryCarry => Section::BoxEntry,
            CounterPath::ShotsUsOn
            | CounterPath::ShotsUsOff
            | CounterPath::ShotsOppOn
            | CounterPath::ShotsOppOff => Section::Shots,
        }
    }

    pub fn get(&self, stats: &HalfStats) -> u32 {
        match self {
            CounterPath::PassingOwnAttempts => stats.passing.own_half.attempts,
            CounterPath::PassingOwnCompleted => stats.passing.own_half.completed,
            CounterPath::PassingOppAttempts => stats.passing.opp_half.attempts,
            CounterPath::PassingOppCompleted => stats.passing.opp_half.completed,
            CounterPath::AttackThirdPass => stats.attack_third.pass,
            CounterPath::AttackThirdCarry => stats.attack_third.carry,
            CounterPath::BoxEntryPass => stats.box_entry.pass,
            CounterPath::BoxEntryCarry => stats.box_entry.carry,
            CounterPath::ShotsUsOn => stats.shots.us.on,
            CounterPath::ShotsUsOff => stats.shots.us.off,
            CounterPath::ShotsOppOn => stats.shots.opp.on,
            CounterPath::ShotsOppOff => stats.shots.opp.off,
        }
    }

    pub fn slot_mut<'a>(&self, stats: &'a mut HalfStats) -> &'a mut u32 {
        match self {
            CounterPath::PassingOwnAttempts => &mut stats.passing.own_half.attempts,
            CounterPath::PassingOwnCompleted => &mut stats.passing.own_half.completed,
            CounterPath::PassingOppAttempts => &mut stats.passing.opp_half.attempts,
            CounterPath::PassingOppCompleted => &mut stats.passing.opp_half.completed,
            CounterPath::AttackThirdPass => &mut stats.attack_third.pass,
            CounterPath::AttackThirdCarry => &mut stats.attack_third.carry,
            CounterPath::BoxEntryPass => &mut stats.box_entry.pass,
            CounterPath::BoxEntryCarry => &mut stats.box_entry.carry,
            CounterPath::ShotsUsOn => &mut stats.shots.us.on,
            CounterPath::ShotsUsOff => &mut stats.shots.us.off,
            CounterPath::ShotsOppOn => &mut stats.shots.opp.on,
            CounterPath::ShotsOppOff => &mut stats.shots.opp.off,
        }
    }

    /// Adds `delta` to the addressed leaf, clamping at zero. Returns the new value.
    pub fn apply(&self, stats: &mut HalfStats, delta: i64) -> u32 {
        let slot = self.slot_mut(stats);
        *slot = apply_delta(*slot, delta);
        *slot
    }
}

impl fmt::Display for CounterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CounterPath {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CounterPath::ALL
            .into_iter()
            .find(|path| path.as_str() == value)
            .ok_or_else(|| ParseError::UnknownCounterPath(value.to_string()))
    }
}

pub fn apply_delta(value: u32, delta: i64) -> u32 {
    i64::from(value)
        .saturating_add(delta)
        .clamp(0, i64::from(u32::MAX)) as u32
}

/// A resettable statistic subtree of one half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Passing,
    AttackThird,
    BoxEntry,
    Shots,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Passing,
        Section::AttackThird,
        Section::BoxEntry,
        Section::Shots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Passing => "passing",
            Section::AttackThird => "attackThird",
            Section::BoxEntry => "boxEntry",
            Section::Shots => "shots",
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = CounterPath> + '_ {
        CounterPath::ALL
            .into_iter()
            .filter(move |path| path.section() == *self)
    }

    /// The collector role that records this section.
    pub fn role(&self) -> CollectorRole {
        match self {
            Section::Passing => CollectorRole::Passing,
            Section::AttackThird => CollectorRole::AttackThird,
            Section::BoxEntry => CollectorRole::BoxEntry,
            Section::Shots => CollectorRole::Shots,
        }
    }

    pub fn reset(&self, stats: &mut HalfStats) {
        match self {
            Section::Passing => stats.passing = PassingStats::default(),
            Section::AttackThird => stats.attack_third = EntryStats::default(),
            Section::BoxEntry => stats.box_entry = EntryStats::default(),
            Section::Shots => stats.shots = ShotStats::default(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == value)
            .ok_or_else(|| ParseError::UnknownSection(value.to_string()))
    }
}
