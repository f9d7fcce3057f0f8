use crate::config::Config;
use crate::data::{DataSource, GameData, Photo, Team, TeamId};
use crate::output::format_countdown;
use crate::ranking::{PointsResult, SortKey};
use crate::state::{Action, Change, GameState};
use crate::tui::theme::{resolve_theme, ThemeColors};
use chrono::{DateTime, Utc};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Leaderboard,
    Achievements,
    Teams,
    Challenges,
    Photos,
    Results,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Leaderboard,
        Tab::Achievements,
        Tab::Teams,
        Tab::Challenges,
        Tab::Photos,
        Tab::Results,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Leaderboard => "Leaderboard",
            Tab::Achievements => "Achievements",
            Tab::Teams => "Teams",
            Tab::Challenges => "Challenges",
            Tab::Photos => "Photos",
            Tab::Results => "Results",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
    Help,
    Breakdown,
    /// Data could not be loaded; only quitting is possible.
    Fatal(String),
}

pub struct App {
    pub state: GameState,
    pub config: Config,
    pub source: DataSource,
    pub current_tab: Tab,
    pub table_state: ratatui::widgets::TableState,
    /// Team shown open in the teams accordion
    pub expanded: Option<TeamId>,
    pub input_mode: InputMode,
    pub search_input: String,
    pub flash_message: Option<(String, Instant)>,
    pub countdown: Option<String>,
    pub needs_reload: bool,
    pub is_loading: bool,
    pub has_loaded: bool,
    pub should_quit: bool,
    pub spinner_frame: usize,
    pub theme_colors: ThemeColors,
}

impl App {
    /// Create an App in loading state, before the first document arrives
    pub fn new_loading(config: Config, source: DataSource) -> Self {
        let state = GameState::new(GameData::default(), config.points.clone(), config.sort);
        let theme_colors = resolve_theme(config.theme);
        Self {
            state,
            config,
            source,
            current_tab: Tab::Leaderboard,
            table_state: ratatui::widgets::TableState::default(),
            expanded: None,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            flash_message: None,
            countdown: None,
            needs_reload: false,
            is_loading: true,
            has_loaded: false,
            should_quit: false,
            spinner_frame: 0,
            theme_colors,
        }
    }

    /// Number of selectable rows on the current tab
    pub fn row_count(&self) -> usize {
        match self.current_tab {
            Tab::Leaderboard => self.state.leaderboard.len(),
            Tab::Achievements => self.state.data.achievements.len(),
            Tab::Teams => self.state.visible_teams().len(),
            Tab::Challenges => self.state.data.challenges.len(),
            Tab::Photos => self.state.data.photos.len(),
            Tab::Results => 0,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn next_tab(&mut self) {
        self.switch_tab(self.current_tab.next());
    }

    pub fn previous_tab(&mut self) {
        self.switch_tab(self.current_tab.previous());
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        if self.row_count() == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    /// Keep the selection inside the current row range
    fn clamp_selection(&mut self) {
        let len = self.row_count();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn selected_team(&self) -> Option<&Team> {
        let idx = self.table_state.selected()?;
        match self.current_tab {
            Tab::Leaderboard => self.state.leaderboard.get(idx),
            Tab::Teams => self.state.visible_teams().get(idx).copied(),
            _ => None,
        }
    }

    /// Points derivation for the selected team
    pub fn selected_points_result(&self) -> Option<&PointsResult> {
        self.selected_team()
            .and_then(|team| self.state.points_result(&team.id))
    }

    pub fn selected_photo(&self) -> Option<&Photo> {
        if self.current_tab != Tab::Photos {
            return None;
        }
        self.table_state
            .selected()
            .and_then(|i| self.state.data.photos.get(i))
    }

    fn dispatch(&mut self, action: Action) {
        for change in self.state.dispatch(action) {
            match change {
                Change::Loaded { teams } => {
                    tracing::debug!(teams, "state rebuilt");
                    let still_listed = self
                        .expanded
                        .as_ref()
                        .is_some_and(|id| self.state.data.find_team(id).is_some());
                    if !still_listed {
                        self.expanded = None;
                    }
                }
                Change::Resorted(key) => tracing::debug!(%key, "leaderboard resorted"),
                Change::Filtered { visible } => tracing::debug!(visible, "teams filtered"),
            }
        }
        self.clamp_selection();
    }

    pub fn set_sort(&mut self, key: SortKey) {
        if key == self.state.sort_key {
            return;
        }
        self.dispatch(Action::SetSort(key));
        self.show_flash(format!("Sorted by {}", key));
    }

    /// Expand the selected team, collapsing any other
    pub fn toggle_selected_team(&mut self) {
        if self.current_tab != Tab::Teams {
            return;
        }
        let id = match self.selected_team() {
            Some(team) => team.id.clone(),
            None => return,
        };
        if self.expanded.as_ref() == Some(&id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id);
        }
    }

    /// Open search input; search always lands on the teams tab
    pub fn start_search(&mut self) {
        if self.current_tab != Tab::Teams {
            self.switch_tab(Tab::Teams);
        }
        self.search_input = self.state.search.clone();
        self.input_mode = InputMode::Search;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.dispatch(Action::Search(self.search_input.clone()));
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
        self.dispatch(Action::Search(self.search_input.clone()));
    }

    pub fn confirm_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.input_mode = InputMode::Normal;
        self.dispatch(Action::ClearSearch);
    }

    /// Open the selected photo in the browser
    pub fn open_selected_photo(&mut self) {
        let photo = match self.selected_photo() {
            Some(p) => p.clone(),
            None => return,
        };
        match crate::browser::open_url(&photo.url) {
            Ok(()) => {
                let label = self.state.data.team_label(&photo.team);
                self.show_flash(format!("Opened photo: {}", label));
            }
            Err(e) => self.show_flash(format!("Failed to open browser: {}", e)),
        }
    }

    /// Replace everything with a freshly loaded document
    pub fn apply_reload(&mut self, data: GameData) {
        self.dispatch(Action::Reload(data));
        self.is_loading = false;
        self.has_loaded = true;
        self.update_countdown(Utc::now());
        let teams = self.state.data.teams.len();
        self.show_flash(format!("Updated ({} teams)", teams));
    }

    /// A failed load is terminal: the dashboard shows the error until quit
    pub fn fail(&mut self, message: String) {
        tracing::error!(error = %message, "data load failed");
        self.is_loading = false;
        self.input_mode = InputMode::Fatal(message);
    }

    pub fn update_countdown(&mut self, now: DateTime<Utc>) {
        self.countdown = self
            .state
            .data
            .next_update_at()
            .map(|next| format_countdown(next, now));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn request_reload(&mut self) {
        self.needs_reload = true;
        self.show_flash("Reloading...".to_string());
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Show how the selected team's points were made up
    pub fn show_breakdown(&mut self) {
        if self.selected_team().is_some() {
            self.input_mode = InputMode::Breakdown;
        }
    }

    pub fn dismiss_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeMode;
    use chrono::TimeZone;

    fn sample_data() -> GameData {
        serde_json::from_str(
            r#"{
                "teams": [
                    { "id": 1, "name": "Alpha", "captain": "Ann", "totalRevenue": 100, "points": 3, "members": [] },
                    { "id": 2, "name": "Beta", "captain": "Bob", "totalRevenue": 900, "points": 8, "members": [] },
                    { "id": 3, "name": "Gamma", "captain": "Gus", "totalRevenue": 500, "points": 5, "members": [] }
                ],
                "photos": [ { "url": "", "description": "Blank", "team": 1 } ],
                "totalRevenue": 1500,
                "nextUpdate": "2024-12-03T12:30:00Z"
            }"#,
        )
        .unwrap()
    }

    fn loaded_app() -> App {
        let config = Config {
            theme: ThemeMode::Dark,
            ..Config::default()
        };
        let mut app = App::new_loading(config, DataSource::parse("data.json"));
        app.apply_reload(sample_data());
        app
    }

    #[test]
    fn test_reload_selects_first_row() {
        let app = loaded_app();
        assert!(app.has_loaded);
        assert!(!app.is_loading);
        assert_eq!(app.table_state.selected(), Some(0));
        assert_eq!(app.selected_team().unwrap().name, "Beta");
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = loaded_app();
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(2));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_tab_cycle() {
        let mut app = loaded_app();
        app.previous_tab();
        assert_eq!(app.current_tab, Tab::Results);
        assert_eq!(app.table_state.selected(), None);
        app.next_tab();
        assert_eq!(app.current_tab, Tab::Leaderboard);
    }

    #[test]
    fn test_set_sort() {
        let mut app = loaded_app();
        app.set_sort(SortKey::Revenue);
        assert_eq!(app.state.sort_key, SortKey::Revenue);
        assert_eq!(app.state.leaderboard[0].name, "Beta");
        assert_eq!(app.state.leaderboard[1].name, "Gamma");
        assert!(app.flash_message.is_some());
    }

    #[test]
    fn test_accordion_keeps_one_team_open() {
        let mut app = loaded_app();
        app.switch_tab(Tab::Teams);
        app.toggle_selected_team();
        assert_eq!(app.expanded, Some(TeamId::Number(2)));

        app.next_row();
        app.toggle_selected_team();
        assert_eq!(app.expanded, Some(TeamId::Number(3)));

        app.toggle_selected_team();
        assert_eq!(app.expanded, None);
    }

    #[test]
    fn test_search_filters_live_and_clears() {
        let mut app = loaded_app();
        app.start_search();
        assert_eq!(app.current_tab, Tab::Teams);
        assert_eq!(app.input_mode, InputMode::Search);

        for c in "gam".chars() {
            app.push_search_char(c);
        }
        assert_eq!(app.row_count(), 1);
        assert_eq!(app.selected_team().unwrap().name, "Gamma");

        app.clear_search();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.row_count(), 3);
    }

    #[test]
    fn test_reload_drops_missing_expanded_team() {
        let mut app = loaded_app();
        app.expanded = Some(TeamId::Number(3));
        app.apply_reload(GameData::default());
        assert_eq!(app.expanded, None);
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_breakdown_needs_selected_team() {
        let mut app = loaded_app();
        app.show_breakdown();
        assert_eq!(app.input_mode, InputMode::Breakdown);
        assert_eq!(app.selected_points_result().unwrap().points, 8);
        app.dismiss_breakdown();

        app.switch_tab(Tab::Results);
        app.show_breakdown();
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_fail_is_fatal() {
        let config = Config {
            theme: ThemeMode::Dark,
            ..Config::default()
        };
        let mut app = App::new_loading(config, DataSource::parse("missing.json"));
        app.fail("Failed to read missing.json".to_string());
        assert!(!app.is_loading);
        assert!(matches!(app.input_mode, InputMode::Fatal(_)));
    }

    #[test]
    fn test_countdown_text() {
        let mut app = loaded_app();
        let now = Utc.with_ymd_and_hms(2024, 12, 1, 10, 0, 0).unwrap();
        app.update_countdown(now);
        assert_eq!(app.countdown.as_deref(), Some("2d 2h 30m"));
    }

    #[test]
    fn test_open_blank_photo_flashes_error() {
        let mut app = loaded_app();
        app.switch_tab(Tab::Photos);
        app.open_selected_photo();
        let (msg, _) = app.flash_message.as_ref().unwrap();
        assert!(msg.starts_with("Failed"));
    }
}
