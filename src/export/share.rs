//! Plain-text summary meant for pasting into a chat.

use crate::{
    i18n::{t, Key, Lang},
    models::{CollectorRole, HalfStats, Match},
};

fn half_block(label: &str, stats: &HalfStats, role: CollectorRole, lang: Lang) -> String {
    let by_pass = t(lang, Key::LabelByPass).to_lowercase();
    let by_carry = t(lang, Key::LabelByCarry).to_lowercase();
    let total = t(lang, Key::SummaryTotal).to_lowercase();
    let on_target = t(lang, Key::LabelOnTarget).to_lowercase();
    let off_target = t(lang, Key::LabelOffTarget).to_lowercase();

    let mut lines = vec![label.to_string()];
    match role {
        CollectorRole::Passing => {
            let own = stats.passing.own_half;
            let opp = stats.passing.opp_half;
            lines.push(format!(
                "{}: {}/{} ({}%)",
                t(lang, Key::SharePassingOwn),
                own.completed,
                own.attempts,
                own.pct()
            ));
            lines.push(format!(
                "{}: {}/{} ({}%)",
                t(lang, Key::SharePassingOpp),
                opp.completed,
                opp.attempts,
                opp.pct()
            ));
        }
        CollectorRole::AttackThird | CollectorRole::BoxEntry => {
            let (key, entries) = if role == CollectorRole::AttackThird {
                (Key::ShareAttackThird, stats.attack_third)
            } else {
                (Key::ShareBoxEntry, stats.box_entry)
            };
            lines.push(format!(
                "{}: {by_pass} {}, {by_carry} {}, {total} {}",
                t(lang, key),
                entries.pass,
                entries.carry,
                entries.total()
            ));
        }
        CollectorRole::Shots => {
            for (key, side) in [
                (Key::ShareShotsUs, stats.shots.us),
                (Key::ShareShotsOpp, stats.shots.opp),
            ] {
                lines.push(format!(
                    "{}: {on_target} {}, {off_target} {}, {total} {}",
                    t(lang, key),
                    side.on,
                    side.off,
                    side.total()
                ));
            }
        }
    }
    lines.join("\n")
}

/// Teams, date and place, optional notes, then one block per half and the
/// total. Only the fields of the match's collector role are listed.
pub fn share_text(record: &Match, lang: Lang) -> String {
    let meta = &record.meta;
    let role = meta.collector_role;

    let mut blocks = vec![
        format!("{} – {}", meta.home_team, meta.away_team),
        format!("{} • {}", meta.date_time, meta.location),
    ];
    if !meta.notes.is_empty() {
        blocks.push(format!("{}: {}", t(lang, Key::ShareNotes), meta.notes));
    }
    blocks.push(half_block(t(lang, Key::ShareHalf1), &record.stats.first, role, lang));
    blocks.push(half_block(t(lang, Key::ShareHalf2), &record.stats.second, role, lang));
    blocks.push(half_block(t(lang, Key::ShareTotal), &record.stats.total(), role, lang));

    blocks.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchMeta;
    use pretty_assertions::assert_eq;

    fn sample(role: CollectorRole, notes: &str) -> Match {
        let mut record = Match::new(MatchMeta {
            date_time: "2024-05-01T18:30".into(),
            location: "Bolt Arena".into(),
            home_team: "HJK".into(),
            away_team: "KuPS".into(),
            notes: notes.into(),
            collector_role: role,
        });
        record.stats.first.passing.own_half.attempts = 4;
        record.stats.first.passing.own_half.completed = 3;
        record.stats.second.passing.opp_half.attempts = 2;
        record.stats.second.passing.opp_half.completed = 1;
        record.stats.first.shots.us.on = 1;
        record.stats.second.shots.us.off = 2;
        record.stats.second.shots.opp.on = 1;
        record.stats.first.box_entry.carry = 2;
        record
    }

    #[test]
    fn passing_summary_in_english() {
        let text = share_text(&sample(CollectorRole::Passing, "windy"), Lang::En);
        let expected = "\
HJK – KuPS
2024-05-01T18:30 • Bolt Arena
Notes: windy
1H
Passing own: 3/4 (75%)
Passing opp: 0/0 (0%)
2H
Passing own: 0/0 (0%)
Passing opp: 1/2 (50%)
Total
Passing own: 3/4 (75%)
Passing opp: 1/2 (50%)";
        assert_eq!(text, expected);
    }

    #[test]
    fn shots_summary_in_finnish_without_notes() {
        let text = share_text(&sample(CollectorRole::Shots, ""), Lang::Fi);
        let expected = "\
HJK – KuPS
2024-05-01T18:30 • Bolt Arena
1PA
Laukaukset me: kohti 1, ohi 0, yhteensä 1
Laukaukset vast: kohti 0, ohi 0, yhteensä 0
2PA
Laukaukset me: kohti 0, ohi 2, yhteensä 2
Laukaukset vast: kohti 1, ohi 0, yhteensä 1
Yhteensä
Laukaukset me: kohti 1, ohi 2, yhteensä 3
Laukaukset vast: kohti 1, ohi 0, yhteensä 1";
        assert_eq!(text, expected);
    }

    #[test]
    fn box_entry_summary_shows_only_box_line() {
        let text = share_text(&sample(CollectorRole::BoxEntry, ""), Lang::En);
        assert!(text.contains("Box entries: by passing 0, by carrying 2, total 2"));
        assert!(!text.contains("Passing own"));
        assert!(!text.contains("Shots us"));
    }
}
