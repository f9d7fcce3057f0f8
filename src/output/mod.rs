pub mod formatter;

pub use formatter::{
    format_achievements, format_challenges, format_countdown, format_currency, format_date,
    format_json, format_leaderboard, format_photos, format_points, format_results,
    format_statistics, format_teams, format_tsv, leaderboard_rows, podium_label,
    should_use_colors, truncate_text, LeaderboardRow,
};
