//! Per-half counter statistics.
//!
//! Every leaf is a `u32`, so the "never negative" rule is carried by the type;
//! the counter paths in `store::counter` do the clamping on the way in.

use serde::{Deserialize, Serialize};

/// Rounded completion percentage. Zero attempts yields 0, never NaN.
pub fn pct(completed: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(attempts) * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassStats {
    pub attempts: u32,
    pub completed: u32,
}

impl PassStats {
    /// `completed` may exceed `attempts`; the percentage then goes above 100.
    pub fn pct(&self) -> u32 {
        pct(self.completed, self.attempts)
    }

    fn combined(&self, other: &Self) -> Self {
        Self {
            attempts: self.attempts.saturating_add(other.attempts),
            completed: self.completed.saturating_add(other.completed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassingStats {
    pub own_half: PassStats,
    pub opp_half: PassStats,
}

/// Entries into the final third or the box, split by how the ball got there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryStats {
    pub pass: u32,
    pub carry: u32,
}

impl EntryStats {
    pub fn total(&self) -> u32 {
        self.pass.saturating_add(self.carry)
    }

    fn combined(&self, other: &Self) -> Self {
        Self {
            pass: self.pass.saturating_add(other.pass),
            carry: self.carry.saturating_add(other.carry),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotSideStats {
    pub on: u32,
    pub off: u32,
}

impl ShotSideStats {
    pub fn total(&self) -> u32 {
        self.on.saturating_add(self.off)
    }

    fn combined(&self, other: &Self) -> Self {
        Self {
            on: self.on.saturating_add(other.on),
            off: self.off.saturating_add(other.off),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotStats {
    pub us: ShotSideStats,
    pub opp: ShotSideStats,
}

/// Full snapshot for one half. Always complete; there is no sparse form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalfStats {
    pub passing: PassingStats,
    pub attack_third: EntryStats,
    pub box_entry: EntryStats,
    pub shots: ShotStats,
}

impl HalfStats {
    /// Element-wise sum of two halves.
    pub fn combined(&self, other: &Self) -> Self {
        Self {
            passing: PassingStats {
                own_half: self.passing.own_half.combined(&other.passing.own_half),
                opp_half: self.passing.opp_half.combined(&other.passing.opp_half),
            },
            attack_third: self.attack_third.combined(&other.attack_third),
            box_entry: self.box_entry.combined(&other.box_entry),
            shots: ShotStats {
                us: self.shots.us.combined(&other.shots.us),
                opp: self.shots.opp.combined(&other.shots.opp),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub first: HalfStats,
    pub second: HalfStats,
}

impl MatchStats {
    pub fn half(&self, half: super::Half) -> &HalfStats {
        match half {
            super::Half::First => &self.first,
            super::Half::Second => &self.second,
        }
    }

    pub fn half_mut(&mut self, half: super::Half) -> &mut HalfStats {
        match half {
            super::Half::First => &mut self.first,
            super::Half::Second => &mut self.second,
        }
    }

    pub fn total(&self) -> HalfStats {
        self.first.combined(&self.second)
    }
}
