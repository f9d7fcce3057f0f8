use super::error::RankingError;
use crate::data::Team;
use serde::Serialize;

/// Competition-wide statistics shown on the results page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub team_count: usize,
    pub member_count: usize,
    pub total_points: u64,
    /// Taken from the data document as-is, never summed from the teams.
    pub total_revenue: f64,
    pub average_revenue: f64,
    pub average_points: u64,
}

/// Compute roster statistics. Averages are rounded to whole units.
///
/// # Errors
///
/// Returns [`RankingError::EmptyRoster`] when `teams` is empty, since the
/// averages would divide by zero.
pub fn compute_aggregates(teams: &[Team], total_revenue: f64) -> Result<Aggregates, RankingError> {
    if teams.is_empty() {
        return Err(RankingError::EmptyRoster);
    }

    let team_count = teams.len();
    let member_count = teams.iter().map(|t| t.members.len()).sum();
    let total_points: u64 = teams.iter().map(|t| u64::from(t.points())).sum();

    Ok(Aggregates {
        team_count,
        member_count,
        total_points,
        total_revenue,
        average_revenue: (total_revenue / team_count as f64).round(),
        average_points: (total_points as f64 / team_count as f64).round() as u64,
    })
}
