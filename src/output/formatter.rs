use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::data::{Achievement, GameData, Team};
use crate::ranking::{podium, winner, Aggregates, PodiumStep, RankedTeam, SortKey};
use crate::state::GameState;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a money amount as whole units with space-grouped thousands: "1 234 567 ₽"
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    if symbol.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{} {}", sign, grouped, symbol)
    }
}

/// Format points; an asterisk marks points derived without all rule inputs.
pub fn format_points(points: u32, incomplete: bool) -> String {
    if incomplete {
        format!("{}*", points)
    } else {
        points.to_string()
    }
}

/// Format a date as dd.mm.yyyy
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d.%m.%Y").to_string()
}

/// Time left until the next data update: "2d 3h 15m", "4h 0m", "12m".
/// Days and hours are omitted when zero; once due, "update pending".
pub fn format_countdown(next_update: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = next_update - now;
    if diff <= chrono::Duration::zero() {
        return "update pending".to_string();
    }

    let days = diff.num_days();
    let hours = diff.num_hours() % 24;
    let minutes = diff.num_minutes() % 60;

    let mut text = String::new();
    if days > 0 {
        text.push_str(&format!("{}d ", days));
    }
    if hours > 0 {
        text.push_str(&format!("{}h ", hours));
    }
    text.push_str(&format!("{}m", minutes));
    text
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// A leaderboard line for display
pub struct LeaderboardRow<'a> {
    pub team: &'a Team,
    pub incomplete: bool,
}

/// Build display rows for the current leaderboard order.
pub fn leaderboard_rows(state: &GameState) -> Vec<LeaderboardRow<'_>> {
    state
        .leaderboard
        .iter()
        .map(|team| LeaderboardRow {
            team,
            incomplete: state
                .points_result(&team.id)
                .map(|r| r.incomplete)
                .unwrap_or(false),
        })
        .collect()
}

/// Format the leaderboard: position, team, captain, points, revenue.
/// Position is the row number in the current sort, the top three highlighted.
pub fn format_leaderboard(rows: &[LeaderboardRow], currency: &str, use_colors: bool) -> String {
    if rows.is_empty() {
        return "No teams yet.".to_string();
    }

    let name_width = rows
        .iter()
        .map(|r| r.team.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(match get_terminal_width() {
            Some(w) if w > 60 => w - 50,
            Some(_) => 20,
            None => usize::MAX,
        });
    let captain_width = rows
        .iter()
        .map(|r| r.team.captain.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let position = format!("{:>2}.", idx + 1);
            let name = pad_right(&truncate_text(&row.team.name, name_width), name_width);
            let captain = pad_right(&truncate_text(&row.team.captain, captain_width), captain_width);
            let points = format!("{:>6}", format_points(row.team.points(), row.incomplete));
            let revenue = format!("{:>16}", format_currency(row.team.total_revenue, currency));

            if use_colors {
                let position = match idx {
                    0 => position.yellow().bold().to_string(),
                    1 => position.white().bold().to_string(),
                    2 => position.red().bold().to_string(),
                    _ => position.dimmed().to_string(),
                };
                format!(
                    "{} {}  {}  {}  {}",
                    position,
                    name.bold(),
                    captain.cyan(),
                    points.bold(),
                    revenue
                )
            } else {
                format!("{} {}  {}  {}  {}", position, name, captain, points, revenue)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the leaderboard as tab-separated values for scripting
/// Columns: position, points, revenue, name, captain (no headers, no colors)
pub fn format_tsv(rows: &[LeaderboardRow]) -> String {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            format!(
                "{}\t{}\t{:.0}\t{}\t{}",
                idx + 1,
                row.team.points(),
                row.team.total_revenue,
                row.team.name,
                row.team.captain
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    sort: SortKey,
    leaderboard: &'a [Team],
    standings: &'a [RankedTeam],
    aggregates: Option<&'a Aggregates>,
}

/// Plain-data export of the ranking output.
pub fn format_json(state: &GameState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        sort: state.sort_key,
        leaderboard: &state.leaderboard,
        standings: &state.standings,
        aggregates: state.aggregates.as_ref().ok(),
    })
}

pub fn podium_label(step: PodiumStep) -> &'static str {
    match step {
        PodiumStep::First => "1st",
        PodiumStep::Second => "2nd",
        PodiumStep::Third => "3rd",
    }
}

/// Format statistics, or an empty-state line when there are no teams.
pub fn format_statistics(aggregates: Option<&Aggregates>, currency: &str) -> String {
    match aggregates {
        Some(stats) => [
            format!("Teams:           {}", stats.team_count),
            format!("Participants:    {}", stats.member_count),
            format!("Total revenue:   {}", format_currency(stats.total_revenue, currency)),
            format!("Total points:    {}", stats.total_points),
            format!("Average revenue: {}", format_currency(stats.average_revenue, currency)),
            format!("Average points:  {}", stats.average_points),
        ]
        .join("\n"),
        None => "No teams registered - statistics unavailable.".to_string(),
    }
}

/// Winner, podium (2nd, 1st, 3rd left to right) and statistics.
pub fn format_results(state: &GameState, currency: &str, use_colors: bool) -> String {
    let mut sections = Vec::new();

    if let Some(top) = winner(&state.standings) {
        let headline = format!("Winner: {}", top.team.name);
        let headline = if use_colors {
            headline.yellow().bold().to_string()
        } else {
            headline
        };
        sections.push(format!(
            "{}\n  Captain: {}\n  Points: {}\n  Revenue: {}",
            headline,
            top.team.captain,
            top.team.points(),
            format_currency(top.team.total_revenue, currency)
        ));
    }

    let slots = podium(&state.standings);
    if !slots.is_empty() {
        let lines: Vec<String> = slots
            .iter()
            .map(|slot| {
                format!(
                    "  [{}] {} ({}) - {} pts, {}",
                    podium_label(slot.step),
                    slot.team.team.name,
                    slot.team.team.captain,
                    slot.team.team.points(),
                    format_currency(slot.team.team.total_revenue, currency)
                )
            })
            .collect();
        sections.push(format!("Podium:\n{}", lines.join("\n")));
    }

    sections.push(format_statistics(state.aggregates.as_ref().ok(), currency));
    sections.join("\n\n")
}

/// Team rosters with their members.
pub fn format_teams(teams: &[&Team], currency: &str, use_colors: bool) -> String {
    if teams.is_empty() {
        return "No teams found.".to_string();
    }

    teams
        .iter()
        .map(|team| {
            let header = format!(
                "{}  (captain: {}, points: {}, revenue: {})",
                team.name,
                team.captain,
                team.points(),
                format_currency(team.total_revenue, currency)
            );
            let header = if use_colors {
                header.bold().to_string()
            } else {
                header
            };
            let members: Vec<String> = team
                .members
                .iter()
                .map(|m| {
                    let marker = if m.is_captain() { "*" } else { " " };
                    format!(
                        "  {} {} | {} | {} | {} pts",
                        marker,
                        m.full_name,
                        m.product,
                        format_currency(m.revenue, currency),
                        m.points.unwrap_or(0)
                    )
                })
                .collect();
            if members.is_empty() {
                header
            } else {
                format!("{}\n{}", header, members.join("\n"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_achievements(achievements: &[Achievement], use_colors: bool) -> String {
    if achievements.is_empty() {
        return "No achievements defined.".to_string();
    }

    achievements
        .iter()
        .map(|a| {
            let points = format!("{:>4}", format!("+{}", a.points));
            if use_colors {
                format!("{}  {}\n      {}", points.green(), a.name.bold(), a.description.dimmed())
            } else {
                format!("{}  {}\n      {}", points, a.name, a.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_challenges(data: &GameData) -> String {
    if data.challenges.is_empty() {
        return "No active challenges yet.".to_string();
    }

    data.challenges
        .iter()
        .map(|c| {
            format!(
                "{} -> {}  [{}]\n  {}",
                data.team_label(&c.from),
                data.team_label(&c.to),
                c.status,
                c.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_photos(data: &GameData) -> String {
    if data.photos.is_empty() {
        return "No photos uploaded yet.".to_string();
    }

    data.photos
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            format!(
                "{:>2}. {} - {}\n    {}",
                idx + 1,
                data.team_label(&p.team),
                p.description,
                p.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
