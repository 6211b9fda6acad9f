use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{timestamp_now, Match};

/// The whole persisted universe: every recorded match, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub matches: Vec<Match>,
}

impl AppState {
    pub fn new(matches: Vec<Match>) -> Self {
        Self {
            matches: dedupe_by_id(matches),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Matches ordered by last update, newest first.
    pub fn recent(&self) -> Vec<&Match> {
        let mut matches: Vec<&Match> = self.matches.iter().collect();
        matches.sort_by(|a, b| b.last_touched().cmp(a.last_touched()));
        matches
    }

    pub(crate) fn with_prepended(&self, record: Match) -> AppState {
        let mut matches = Vec::with_capacity(self.matches.len() + 1);
        matches.push(record);
        matches.extend(self.matches.iter().cloned());
        AppState { matches }
    }

    pub(crate) fn without(&self, id: &str) -> Option<AppState> {
        self.find(id)?;
        Some(AppState {
            matches: self.matches.iter().filter(|m| m.id != id).cloned().collect(),
        })
    }

    /// Copies the state with `update` applied to one match and its `updatedAt`
    /// refreshed. `None` when no match has this id.
    pub(crate) fn with_updated<F>(&self, id: &str, update: F) -> Option<AppState>
    where
        F: FnOnce(&mut Match),
    {
        let index = self.matches.iter().position(|m| m.id == id)?;
        let mut matches = self.matches.clone();
        let record = &mut matches[index];
        update(record);
        record.updated_at = timestamp_now();
        Some(AppState { matches })
    }

    /// Union by id. Incoming records replace existing ones in place; new ids
    /// are appended in incoming order.
    pub(crate) fn merged(&self, incoming: Vec<Match>) -> AppState {
        let mut matches = self.matches.clone();
        matches.extend(incoming);
        AppState {
            matches: dedupe_by_id(matches),
        }
    }
}

/// First position wins, last value wins.
fn dedupe_by_id(matches: Vec<Match>) -> Vec<Match> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(matches.len());
    let mut unique: Vec<Match> = Vec::with_capacity(matches.len());
    for record in matches {
        match positions.get(&record.id) {
            Some(&index) => unique[index] = record,
            None => {
                positions.insert(record.id.clone(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchMeta;

    fn record(id: &str, shots: u32) -> Match {
        let mut m = Match::new(MatchMeta::default());
        m.id = id.to_string();
        m.stats.first.shots.us.on = shots;
        m
    }

    fn ids(state: &AppState) -> Vec<&str> {
        state.matches.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn merge_replaces_whole_records_and_keeps_others() {
        let state = AppState::new(vec![record("a", 1), record("b", 2)]);
        let merged = state.merged(vec![record("b", 9), record("c", 3)]);

        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
        assert_eq!(merged.find("a").unwrap().stats.first.shots.us.on, 1);
        assert_eq!(merged.find("b").unwrap().stats.first.shots.us.on, 9);
        assert_eq!(merged.find("c").unwrap().stats.first.shots.us.on, 3);
    }

    #[test]
    fn duplicate_incoming_ids_collapse_to_last_value() {
        let state = AppState::new(vec![record("x", 1), record("y", 1), record("x", 5)]);
        assert_eq!(ids(&state), vec!["x", "y"]);
        assert_eq!(state.find("x").unwrap().stats.first.shots.us.on, 5);
    }

    #[test]
    fn update_on_missing_id_is_none() {
        let state = AppState::new(vec![record("a", 0)]);
        assert!(state.with_updated("missing", |_| {}).is_none());
        assert!(state.without("missing").is_none());
    }

    #[test]
    fn update_leaves_source_untouched() {
        let state = AppState::new(vec![record("a", 0)]);
        let next = state
            .with_updated("a", |m| m.stats.first.shots.us.on = 4)
            .unwrap();
        assert_eq!(state.find("a").unwrap().stats.first.shots.us.on, 0);
        assert_eq!(next.find("a").unwrap().stats.first.shots.us.on, 4);
    }

    #[test]
    fn recent_orders_by_update_time() {
        let mut older = record("old", 0);
        older.updated_at = "2024-01-01T10:00:00.000Z".into();
        let mut newer = record("new", 0);
        newer.updated_at = "2024-03-01T10:00:00.000Z".into();
        let state = AppState::new(vec![older, newer]);

        let order: Vec<&str> = state.recent().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, vec!["new", "old"]);
    }
}
