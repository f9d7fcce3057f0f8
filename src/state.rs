//! Application state and the actions that change it.
//!
//! Presenters never mutate the state directly. They dispatch an [`Action`] and
//! react to the returned [`Change`]s; every ranking output is rebuilt from the
//! full roster on each change.

use crate::data::{filter_teams, GameData, Team, TeamId};
use crate::ranking::{
    compute_aggregates, compute_standings, resolve_points, sort_by_key, Aggregates, PointsConfig,
    PointsResult, RankedTeam, RankingError, SortKey,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum Action {
    SetSort(SortKey),
    Search(String),
    ClearSearch,
    Reload(GameData),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::SetSort(_) => "set_sort",
            Action::Search(_) => "search",
            Action::ClearSearch => "clear_search",
            Action::Reload(_) => "reload",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Loaded { teams: usize },
    Resorted(SortKey),
    Filtered { visible: usize },
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Game document with resolved points, teams in document order.
    pub data: GameData,
    pub sort_key: SortKey,
    pub search: String,
    /// Teams in display order for the current sort key.
    pub leaderboard: Vec<Team>,
    pub standings: Vec<RankedTeam>,
    pub aggregates: Result<Aggregates, RankingError>,
    points_config: PointsConfig,
    points: HashMap<TeamId, PointsResult>,
}

impl GameState {
    pub fn new(data: GameData, points_config: PointsConfig, sort_key: SortKey) -> Self {
        let mut state = Self {
            data: GameData::default(),
            sort_key,
            search: String::new(),
            leaderboard: Vec::new(),
            standings: Vec::new(),
            aggregates: Err(RankingError::EmptyRoster),
            points_config,
            points: HashMap::new(),
        };
        state.load(data);
        state
    }

    pub fn points_config(&self) -> &PointsConfig {
        &self.points_config
    }

    /// Points derivation details for a team, if it is on the roster.
    pub fn points_result(&self, id: &TeamId) -> Option<&PointsResult> {
        self.points.get(id)
    }

    /// True when any team's derived points are missing rule input.
    pub fn any_incomplete(&self) -> bool {
        self.points.values().any(|r| r.incomplete)
    }

    /// Leaderboard teams matching the current search query.
    pub fn visible_teams(&self) -> Vec<&Team> {
        filter_teams(&self.leaderboard, &self.search)
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Change> {
        tracing::debug!(action = action.name(), "dispatch");
        match action {
            Action::SetSort(key) => {
                if key == self.sort_key {
                    return Vec::new();
                }
                self.sort_key = key;
                self.leaderboard = sort_by_key(&self.data.teams, key);
                vec![Change::Resorted(key)]
            }
            Action::Search(query) => {
                self.search = query;
                vec![Change::Filtered {
                    visible: self.visible_teams().len(),
                }]
            }
            Action::ClearSearch => {
                if self.search.is_empty() {
                    return Vec::new();
                }
                self.search.clear();
                vec![Change::Filtered {
                    visible: self.leaderboard.len(),
                }]
            }
            Action::Reload(data) => {
                self.load(data);
                let mut changes = vec![Change::Loaded {
                    teams: self.data.teams.len(),
                }];
                if !self.search.is_empty() {
                    changes.push(Change::Filtered {
                        visible: self.visible_teams().len(),
                    });
                }
                changes
            }
        }
    }

    fn load(&mut self, mut data: GameData) {
        let resolved = resolve_points(&data.teams, &self.points_config);
        self.points = resolved
            .teams
            .iter()
            .map(|t| t.id.clone())
            .zip(resolved.results)
            .collect();
        data.teams = resolved.teams;

        self.leaderboard = sort_by_key(&data.teams, self.sort_key);
        self.standings = compute_standings(&data.teams);
        self.aggregates = compute_aggregates(&data.teams, data.total_revenue);
        if self.aggregates.is_err() {
            tracing::info!("roster is empty, statistics unavailable");
        }
        self.data = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::PointsMode;

    fn sample_data() -> GameData {
        serde_json::from_str(
            r#"{
                "teams": [
                    { "id": 1, "name": "Alpha", "captain": "Ann", "totalRevenue": 300000, "points": 4,
                      "members": [ { "fio": "Ann", "product": "Cards", "revenue": 300000, "status": "captain" } ] },
                    { "id": 2, "name": "Beta", "captain": "Bob", "totalRevenue": 100000, "points": 9,
                      "members": [ { "fio": "Bob", "product": "Loans", "revenue": 100000, "status": "captain" },
                                   { "fio": "Kate", "product": "Loans", "revenue": 0, "status": "player" } ] }
                ],
                "totalRevenue": 400000
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_new_state_supplied_points() {
        let state = GameState::new(sample_data(), PointsConfig::default(), SortKey::Points);
        assert_eq!(state.leaderboard[0].name, "Beta");
        assert_eq!(state.standings[0].place, 1);
        assert_eq!(state.standings[1].place, 2);
        let stats = state.aggregates.as_ref().unwrap();
        assert_eq!(stats.total_points, 13);
        assert_eq!(stats.member_count, 3);
        assert!(!state.any_incomplete());
    }

    #[test]
    fn test_new_state_derived_points() {
        let config = PointsConfig {
            mode: PointsMode::Derive,
            ..PointsConfig::default()
        };
        let state = GameState::new(sample_data(), config, SortKey::Points);
        // Alpha: top revenue +5, one member >= 100000 +2 = 7; Beta: one member +2 = 2
        assert_eq!(state.leaderboard[0].name, "Alpha");
        assert_eq!(state.leaderboard[0].points, Some(7));
        assert_eq!(state.points_result(&TeamId::Number(2)).unwrap().points, 2);
        assert_eq!(state.aggregates.as_ref().unwrap().total_points, 9);
    }

    #[test]
    fn test_set_sort_recomputes_leaderboard_only() {
        let mut state = GameState::new(sample_data(), PointsConfig::default(), SortKey::Points);
        let changes = state.dispatch(Action::SetSort(SortKey::Revenue));
        assert_eq!(changes, vec![Change::Resorted(SortKey::Revenue)]);
        assert_eq!(state.leaderboard[0].name, "Alpha");
        // Standings are always by points
        assert_eq!(state.standings[0].team.name, "Beta");
    }

    #[test]
    fn test_set_same_sort_is_noop() {
        let mut state = GameState::new(sample_data(), PointsConfig::default(), SortKey::Points);
        assert!(state.dispatch(Action::SetSort(SortKey::Points)).is_empty());
    }

    #[test]
    fn test_search_and_clear() {
        let mut state = GameState::new(sample_data(), PointsConfig::default(), SortKey::Points);
        let changes = state.dispatch(Action::Search("kate".to_string()));
        assert_eq!(changes, vec![Change::Filtered { visible: 1 }]);
        assert_eq!(state.visible_teams()[0].name, "Beta");

        let changes = state.dispatch(Action::ClearSearch);
        assert_eq!(changes, vec![Change::Filtered { visible: 2 }]);
        assert!(state.dispatch(Action::ClearSearch).is_empty());
    }

    #[test]
    fn test_reload_replaces_everything() {
        let mut state = GameState::new(sample_data(), PointsConfig::default(), SortKey::Points);
        let changes = state.dispatch(Action::Reload(GameData::default()));
        assert_eq!(changes, vec![Change::Loaded { teams: 0 }]);
        assert!(state.leaderboard.is_empty());
        assert!(state.standings.is_empty());
        assert_eq!(state.aggregates, Err(RankingError::EmptyRoster));
    }
}
