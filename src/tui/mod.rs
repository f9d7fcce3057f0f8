pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use std::time::Duration;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::data::{load_game_data, DataError, GameData};
use crate::ranking::SortKey;

const TICK_RATE: Duration = Duration::from_millis(250);

type LoadHandle = tokio::task::JoinHandle<Result<GameData, DataError>>;

fn spawn_load(app: &mut App) -> LoadHandle {
    app.is_loading = true;
    let source = app.source.clone();
    tokio::spawn(async move { load_game_data(&source).await })
}

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(TICK_RATE, app.config.countdown_interval());

    // Initial load runs in the background so the dashboard renders at once
    let mut pending_load: Option<LoadHandle> = Some(spawn_load(&mut app));

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
            Event::Countdown => app.update_countdown(Utc::now()),
        }

        if let Some(handle) = pending_load.take_if(|h| h.is_finished()) {
            match handle.await {
                Ok(Ok(data)) => app.apply_reload(data),
                Ok(Err(e)) => app.fail(e.to_string()),
                Err(e) => app.fail(format!("Load task panicked: {}", e)),
            }
        }

        if app.needs_reload && pending_load.is_none() {
            app.needs_reload = false;
            pending_load = Some(spawn_load(&mut app));
        }

        if app.should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ctrl-C quits from any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => app.next_tab(),
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => app.previous_tab(),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                app.switch_tab(app::Tab::ALL[idx]);
            }

            // Sort
            KeyCode::Char('p') => app.set_sort(SortKey::Points),
            KeyCode::Char('v') => app.set_sort(SortKey::Revenue),

            // Expand team or open photo
            KeyCode::Enter => match app.current_tab {
                app::Tab::Teams => app.toggle_selected_team(),
                app::Tab::Photos => app.open_selected_photo(),
                _ => {}
            },

            // Search
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Esc => app.clear_search(),

            KeyCode::Char('r') => app.request_reload(),
            KeyCode::Char('?') => app.show_help(),
            KeyCode::Char('b') => app.show_breakdown(),
            _ => {}
        },
        app::InputMode::Breakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => app.dismiss_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Search => match key.code {
            KeyCode::Enter => app.confirm_search(),
            KeyCode::Esc => app.clear_search(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Char(c) => app.push_search_char(c),
            // Ignore all other keys (don't propagate to Normal mode)
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
        app::InputMode::Fatal(_) => {
            if key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                app.should_quit = true;
            }
        }
    }
}
