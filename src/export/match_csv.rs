use anyhow::{Context, Result};

use crate::models::{HalfStats, Match};

pub const HEADER: [&str; 19] = [
    "half",
    "passing_own_attempts",
    "passing_own_completed",
    "passing_own_pct",
    "passing_opp_attempts",
    "passing_opp_completed",
    "passing_opp_pct",
    "attack_third_pass",
    "attack_third_carry",
    "attack_third_total",
    "box_pass",
    "box_carry",
    "box_total",
    "shots_us_on",
    "shots_us_off",
    "shots_us_total",
    "shots_opp_on",
    "shots_opp_off",
    "shots_opp_total",
];

fn row(label: &str, stats: &HalfStats) -> Vec<String> {
    let own = stats.passing.own_half;
    let opp = stats.passing.opp_half;
    let mut cells = vec![label.to_string()];
    cells.extend(
        [
            own.attempts,
            own.completed,
            own.pct(),
            opp.attempts,
            opp.completed,
            opp.pct(),
            stats.attack_third.pass,
            stats.attack_third.carry,
            stats.attack_third.total(),
            stats.box_entry.pass,
            stats.box_entry.carry,
            stats.box_entry.total(),
            stats.shots.us.on,
            stats.shots.us.off,
            stats.shots.us.total(),
            stats.shots.opp.on,
            stats.shots.opp.off,
            stats.shots.opp.total(),
        ]
        .iter()
        .map(u32::to_string),
    );
    cells
}

/// Header plus `1PA`, `2PA` and `TOTAL` rows.
pub fn match_csv(record: &Match) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    writer.write_record(row("1PA", &record.stats.first))?;
    writer.write_record(row("2PA", &record.stats.second))?;
    writer.write_record(row("TOTAL", &record.stats.total()))?;

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to finish CSV: {err}"))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}
