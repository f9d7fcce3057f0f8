use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap};

use crate::data::Team;
use crate::output::{
    format_currency, format_date, format_points, podium_label, truncate_text,
};
use crate::ranking::{podium, winner, PodiumStep, PointsMode, SortKey};
use crate::tui::app::{App, InputMode, Tab};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Tab bar
        Constraint::Fill(1),   // Tab content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_tab {
        Tab::Leaderboard => render_leaderboard(frame, chunks[2], app),
        Tab::Achievements => render_achievements(frame, chunks[2], app),
        Tab::Teams => render_teams(frame, chunks[2], app),
        Tab::Challenges => render_challenges(frame, chunks[2], app),
        Tab::Photos => render_photos(frame, chunks[2], app),
        Tab::Results => render_results(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match &app.input_mode {
        InputMode::Search => render_search_popup(frame, app),
        InputMode::Help => render_help_popup(frame, &app.theme_colors),
        InputMode::Breakdown => render_breakdown_popup(frame, app),
        InputMode::Fatal(message) => render_fatal_popup(frame, message, &app.theme_colors),
        InputMode::Normal => {}
    }

    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.theme_colors;
    let left = "Sales Leaderboard";
    let mut spans = vec![Span::styled(left, Style::default().fg(colors.title_color).bold())];

    if let Some(updated) = app.state.data.last_updated_at() {
        let right = format!("Updated {}", format_date(updated));
        let padding_len = (area.width as usize).saturating_sub(left.len() + right.chars().count());
        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(right, Style::default().fg(colors.muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .select(app.current_tab.index())
        .style(app.theme_colors.tab_inactive_style)
        .highlight_style(app.theme_colors.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_empty(frame: &mut Frame, area: Rect, message: &str, colors: &ThemeColors) {
    let empty_msg = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors.muted));
    frame.render_widget(empty_msg, area);
}

fn alt_row_style(idx: usize, colors: &ThemeColors) -> Style {
    if idx % 2 == 1 {
        Style::default().bg(colors.row_alt_bg)
    } else {
        Style::default()
    }
}

fn render_leaderboard(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = &app.theme_colors;
    if app.state.leaderboard.is_empty() {
        let msg = if app.has_loaded { "No teams yet" } else { "" };
        render_empty(frame, area, msg, colors);
        return;
    }

    let currency = &app.config.currency;
    let rows: Vec<Row> = app
        .state
        .leaderboard
        .iter()
        .enumerate()
        .map(|(idx, team)| {
            let incomplete = app
                .state
                .points_result(&team.id)
                .is_some_and(|r| r.incomplete);
            let position_style = match colors.position_color(idx) {
                Some(color) => Style::default().fg(color).bold(),
                None => Style::default().fg(colors.index_color),
            };
            let name_style = if idx < 3 {
                Style::default().bold()
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(position_style),
                Cell::from(truncate_text(&team.name, 40)).style(name_style),
                Cell::from(truncate_text(&team.captain, 30)),
                Cell::from(format!("{:>6}", format_points(team.points(), incomplete))),
                Cell::from(format!("{:>16}", format_currency(team.total_revenue, currency)))
                    .style(Style::default().fg(colors.money)),
            ])
            .style(alt_row_style(idx, colors))
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // Position: "99."
        Constraint::Fill(2),    // Team
        Constraint::Fill(1),    // Captain
        Constraint::Length(7),  // Points
        Constraint::Length(17), // Revenue
    ];

    let (points_header, revenue_header) = match app.state.sort_key {
        SortKey::Points => ("Points v", "Revenue"),
        SortKey::Revenue => ("Points", "Revenue v"),
    };

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Team", "Captain", points_header, revenue_header])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_achievements(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = &app.theme_colors;
    if app.state.data.achievements.is_empty() {
        render_empty(frame, area, "No achievements defined", colors);
        return;
    }

    let rows: Vec<Row> = app
        .state
        .data
        .achievements
        .iter()
        .enumerate()
        .map(|(idx, a)| {
            Row::new(vec![
                Cell::from(format!("+{}", a.points)).style(Style::default().fg(colors.money).bold()),
                Cell::from(a.name.clone()).style(Style::default().bold()),
                Cell::from(a.description.clone()),
            ])
            .style(alt_row_style(idx, colors))
        })
        .collect();

    let widths = [Constraint::Length(6), Constraint::Fill(1), Constraint::Fill(2)];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Points", "Achievement", "Description"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn team_row<'a>(team: &Team, expanded: bool, currency: &str, colors: &ThemeColors) -> Row<'a> {
    let marker = if expanded { "v" } else { ">" };
    Row::new(vec![
        Cell::from(marker).style(Style::default().fg(colors.index_color)),
        Cell::from(team.name.clone()).style(Style::default().bold()),
        Cell::from(format!("captain: {}", team.captain)),
        Cell::from(format!("{} pts", team.points())),
        Cell::from(format_currency(team.total_revenue, currency))
            .style(Style::default().fg(colors.money)),
    ])
}

fn member_rows<'a>(team: &Team, currency: &str, colors: &ThemeColors) -> Vec<Row<'a>> {
    if team.members.is_empty() {
        return vec![Row::new(vec![
            Cell::from(""),
            Cell::from("  no members listed").style(Style::default().fg(colors.muted)),
        ])];
    }

    team.members
        .iter()
        .map(|m| {
            let name = if m.is_captain() {
                format!("  {} (captain)", m.full_name)
            } else {
                format!("  {}", m.full_name)
            };
            Row::new(vec![
                Cell::from(""),
                Cell::from(name),
                Cell::from(m.product.clone()).style(Style::default().fg(colors.muted)),
                Cell::from(format!("{} pts", m.points.unwrap_or(0))),
                Cell::from(format_currency(m.revenue, currency)),
            ])
            .style(Style::default().fg(colors.muted))
        })
        .collect()
}

fn render_teams(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = &app.theme_colors;
    let teams = app.state.visible_teams();

    let (filter_area, table_area) = if app.state.search.is_empty() {
        (None, area)
    } else {
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).split(area);
        (Some(chunks[0]), chunks[1])
    };

    if let Some(filter_area) = filter_area {
        let line = Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(colors.muted)),
            Span::styled(app.state.search.clone(), Style::default().bold()),
            Span::styled(
                format!("  ({} of {} teams, Esc clears)", teams.len(), app.state.leaderboard.len()),
                Style::default().fg(colors.muted),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), filter_area);
    }

    if teams.is_empty() {
        let msg = if app.state.search.is_empty() {
            "No teams yet"
        } else {
            "No teams match the search"
        };
        render_empty(frame, table_area, msg, colors);
        return;
    }

    // Member rows sit between team rows, so map the selected team to its display row
    let currency = &app.config.currency;
    let selected = app.table_state.selected();
    let mut rows = Vec::new();
    let mut display_selected = None;
    for (idx, team) in teams.iter().enumerate() {
        if selected == Some(idx) {
            display_selected = Some(rows.len());
        }
        let expanded = app.expanded.as_ref() == Some(&team.id);
        rows.push(team_row(team, expanded, currency, colors));
        if expanded {
            rows.extend(member_rows(team, currency, colors));
        }
    }

    let widths = [
        Constraint::Length(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(10),
        Constraint::Length(17),
    ];
    let table = Table::new(rows, widths).row_highlight_style(colors.row_selected);
    let mut state = TableState::default().with_selected(display_selected);
    frame.render_stateful_widget(table, table_area, &mut state);
}

fn render_challenges(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = &app.theme_colors;
    let data = &app.state.data;
    if data.challenges.is_empty() {
        render_empty(frame, area, "No active challenges yet", colors);
        return;
    }

    let rows: Vec<Row> = data
        .challenges
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            Row::new(vec![
                Cell::from(data.team_label(&c.from)).style(Style::default().bold()),
                Cell::from(data.team_label(&c.to)).style(Style::default().bold()),
                Cell::from(c.description.clone()),
                Cell::from(c.status.clone()).style(Style::default().fg(colors.muted)),
            ])
            .style(alt_row_style(idx, colors))
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["From", "To", "Challenge", "Status"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_photos(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = &app.theme_colors;
    let data = &app.state.data;
    if data.photos.is_empty() {
        render_empty(frame, area, "No photos uploaded yet", colors);
        return;
    }

    let rows: Vec<Row> = data
        .photos
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(colors.index_color)),
                Cell::from(data.team_label(&p.team)).style(Style::default().bold()),
                Cell::from(p.description.clone()),
                Cell::from(p.url.clone()).style(Style::default().fg(colors.muted)),
            ])
            .style(alt_row_style(idx, colors))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(2),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Team", "Description", "URL"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.theme_colors;
    let currency = &app.config.currency;

    let stats = match &app.state.aggregates {
        Ok(stats) => stats,
        Err(_) => {
            let msg = if app.has_loaded {
                "No teams registered - results unavailable"
            } else {
                ""
            };
            render_empty(frame, area, msg, colors);
            return;
        }
    };

    let chunks = Layout::vertical([
        Constraint::Length(4), // Winner card
        Constraint::Length(6), // Podium
        Constraint::Fill(1),   // Statistics
    ])
    .split(area);

    if let Some(top) = winner(&app.state.standings) {
        let lines = vec![
            Line::from(Span::styled(
                top.team.name.clone(),
                Style::default().fg(colors.gold).bold(),
            )),
            Line::from(format!(
                "Captain: {}   Points: {}   Revenue: {}",
                top.team.captain,
                top.team.points(),
                format_currency(top.team.total_revenue, currency)
            )),
        ];
        let card = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" Winner ").border_style(Style::default().fg(colors.gold)));
        frame.render_widget(card, chunks[0]);
    }

    // Podium: second, first, third from left to right
    let slots = podium(&app.state.standings);
    if !slots.is_empty() {
        let constraints = vec![Constraint::Fill(1); slots.len()];
        let columns = Layout::horizontal(constraints).split(chunks[1]);
        for (slot, column) in slots.iter().zip(columns.iter()) {
            let color = match slot.step {
                PodiumStep::First => colors.gold,
                PodiumStep::Second => colors.silver,
                PodiumStep::Third => colors.bronze,
            };
            // Lower steps sit lower, like a real podium
            let offset = match slot.step {
                PodiumStep::First => 0,
                PodiumStep::Second => 1,
                PodiumStep::Third => 2,
            };
            let step_area = Rect {
                y: column.y + offset,
                height: column.height.saturating_sub(offset),
                ..*column
            };
            let lines = vec![
                Line::from(Span::styled(slot.team.team.name.clone(), Style::default().bold())),
                Line::from(format!("{} pts", slot.team.team.points())),
            ];
            let step = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::bordered()
                        .title(format!(" {} ", podium_label(slot.step)))
                        .border_style(Style::default().fg(color)),
                );
            frame.render_widget(step, step_area);
        }
    }

    let stat = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<18}", label), Style::default().fg(colors.muted)),
            Span::styled(value, Style::default().bold()),
        ])
    };
    let lines = vec![
        stat("Teams", stats.team_count.to_string()),
        stat("Participants", stats.member_count.to_string()),
        stat("Total revenue", format_currency(stats.total_revenue, currency)),
        stat("Total points", stats.total_points.to_string()),
        stat("Average revenue", format_currency(stats.average_revenue, currency)),
        stat("Average points", stats.average_points.to_string()),
    ];
    let block = Block::bordered().title(" Statistics ");
    frame.render_widget(Paragraph::new(lines).block(block), chunks[2]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.theme_colors;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") {
            colors.flash_error
        } else {
            colors.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let mut spans = vec![Span::styled(
            format!(
                "Total {}",
                format_currency(app.state.data.total_revenue, &app.config.currency)
            ),
            Style::default().fg(colors.muted),
        )];
        if let Some(countdown) = &app.countdown {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("next update: {}", countdown),
                Style::default().fg(colors.muted),
            ));
        }
        if app.state.any_incomplete() {
            spans.push(Span::styled("  * partial points", Style::default().fg(colors.muted)));
        }
        spans.push(Span::raw("  "));

        let hints: &[(&str, &str)] = match app.current_tab {
            Tab::Leaderboard => &[("p/v", ":sort "), ("b", ":points "), ("Tab", ":next "), ("r", ":reload "), ("?", ":help "), ("q", ":quit")],
            Tab::Teams => &[("Enter", ":expand "), ("/", ":search "), ("Tab", ":next "), ("?", ":help "), ("q", ":quit")],
            Tab::Photos => &[("Enter", ":open "), ("Tab", ":next "), ("r", ":reload "), ("?", ":help "), ("q", ":quit")],
            _ => &[("Tab", ":next "), ("r", ":reload "), ("?", ":help "), ("q", ":quit")],
        };
        for (key, label) in hints {
            spans.push(Span::styled(*key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the team search input popup
fn render_search_popup(frame: &mut Frame, app: &App) {
    let colors = &app.theme_colors;
    let popup_area = centered_rect_fixed(50, 4, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Search Teams ")
        .title_style(colors.popup_title)
        .border_style(Style::default().fg(colors.popup_border));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);
    frame.render_widget(Paragraph::new(format!("{}|", app.search_input)), chunks[0]);
    frame.render_widget(
        Paragraph::new("Team, captain or member | Enter: keep | Esc: clear")
            .style(Style::default().fg(colors.muted)),
        chunks[1],
    );
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 18, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Keyboard Shortcuts ")
        .title_style(colors.popup_title)
        .border_style(Style::default().fg(colors.popup_border));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let entry = |key: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(format!("{:<14}", key), key_style), Span::raw(desc)])
    };
    let help_lines = vec![
        entry("j / Down", "Move down"),
        entry("k / Up", "Move up"),
        entry("Tab / l", "Next tab"),
        entry("S-Tab / h", "Previous tab"),
        entry("1-6", "Jump to tab"),
        entry("p", "Sort leaderboard by points"),
        entry("v", "Sort leaderboard by revenue"),
        entry("Enter", "Expand team / open photo"),
        entry("b", "Points breakdown"),
        entry("/", "Search teams"),
        entry("Esc", "Clear search"),
        entry("r", "Reload data"),
        entry("?", "Show/hide this help"),
        entry("q / Ctrl-c", "Quit"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(colors.muted))),
    ];

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the points breakdown for the selected team
fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let colors = &app.theme_colors;
    let (team, result) = match (app.selected_team(), app.selected_points_result()) {
        (Some(team), Some(result)) => (team, result),
        _ => return,
    };

    let mut lines = Vec::new();
    if result.breakdown.contributions.is_empty() && result.breakdown.unavailable.is_empty() {
        let note = match app.state.points_config().mode {
            PointsMode::Supplied => "Points as published in the data file",
            PointsMode::Derive => "No rule awarded points",
        };
        lines.push(Line::from(Span::styled(note, Style::default().fg(colors.muted))));
    }
    for c in &result.breakdown.contributions {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>4} ", format!("+{}", c.points)), Style::default().fg(colors.money).bold()),
            Span::styled(c.label.clone(), Style::default().bold()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {}", c.description),
            Style::default().fg(colors.muted),
        )));
    }
    for u in &result.breakdown.unavailable {
        lines.push(Line::from(vec![
            Span::styled("   * ", Style::default().fg(colors.flash_error)),
            Span::raw(format!("{}: {}", u.label, u.description)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Total ", Style::default().bold()),
        Span::styled(
            format_points(result.points, result.incomplete),
            Style::default().fg(colors.money).bold(),
        ),
    ]));

    let height = (lines.len() as u16).saturating_add(2);
    let popup_area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(format!(" {} ", truncate_text(&team.name, 40)))
        .title_style(colors.popup_title)
        .border_style(Style::default().fg(colors.popup_border));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), popup_area);
}

/// Render the blocking error notice after a failed load
fn render_fatal_popup(frame: &mut Frame, message: &str, colors: &ThemeColors) {
    let popup_area = centered_rect_fixed(60, 8, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Data unavailable ")
        .border_style(Style::default().fg(colors.fatal_border));
    let lines = vec![
        Line::from(Span::styled(
            "The game data could not be loaded.",
            Style::default().bold(),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("Press q to quit", Style::default().fg(colors.muted))),
    ];
    let text = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(text, popup_area);
}

/// Render the loading spinner overlay
fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % 10];

    let text = if app.has_loaded {
        format!("{} Reloading...", spinner)
    } else {
        format!("{} Loading data...", spinner)
    };

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme_colors.title_color));

    frame.render_widget(loading_text, inner);
}
