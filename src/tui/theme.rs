//! Centralized theme module for TUI colors and styles

use ratatui::prelude::*;

use crate::config::ThemeMode;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Podium colors for the top three rows
    pub gold: Color,
    pub silver: Color,
    pub bronze: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,
    pub money: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub fatal_border: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            gold: Color::Yellow,
            silver: Color::Gray,
            bronze: Color::Rgb(205, 127, 50),
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            money: Color::Green,
            tab_active_style: Style::new().fg(Color::Cyan).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            fatal_border: Color::Red,
        }
    }

    pub fn light() -> Self {
        Self {
            gold: Color::Rgb(184, 134, 11),
            silver: Color::DarkGray,
            bronze: Color::Rgb(160, 82, 45),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            money: Color::Rgb(0, 128, 0),
            tab_active_style: Style::new().fg(Color::Blue).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::Gray),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 128, 0),
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            fatal_border: Color::Red,
        }
    }

    /// Color for a leaderboard position, None below the podium.
    pub fn position_color(&self, index: usize) -> Option<Color> {
        match index {
            0 => Some(self.gold),
            1 => Some(self.silver),
            2 => Some(self.bronze),
            _ => None,
        }
    }
}

/// Pick a palette. `Auto` asks the terminal for its background luminance
/// and falls back to dark when the terminal does not answer.
pub fn resolve_theme(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            Ok(_) => ThemeColors::dark(),
            Err(e) => {
                tracing::debug!(error = %e, "terminal background unknown, using dark theme");
                ThemeColors::dark()
            }
        },
    }
}
