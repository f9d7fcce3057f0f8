use crate::data::Team;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Leaderboard sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Points,
    Revenue,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Points => write!(f, "points"),
            SortKey::Revenue => write!(f, "revenue"),
        }
    }
}

/// Sort descending by the chosen key. The sort is stable: teams with equal
/// keys keep their input order. No revenue tie-break is applied here.
pub fn sort_by_key(teams: &[Team], key: SortKey) -> Vec<Team> {
    let mut sorted = teams.to_vec();
    match key {
        SortKey::Points => sorted.sort_by(|a, b| b.points().cmp(&a.points())),
        SortKey::Revenue => sorted.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue)),
    }
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTeam {
    #[serde(flatten)]
    pub team: Team,
    pub place: u32,
}

/// Primary: points descending. Tie-breaker: total revenue descending.
fn standings_order(a: &Team, b: &Team) -> Ordering {
    b.points()
        .cmp(&a.points())
        .then_with(|| b.total_revenue.total_cmp(&a.total_revenue))
}

/// Rank teams with competition ranking (1, 1, 3).
///
/// Whether two adjacent teams share a place is decided on points alone, so
/// equal points with different revenue still share a place even though the
/// revenue tie-break orders them. Empty input yields an empty result.
pub fn compute_standings(teams: &[Team]) -> Vec<RankedTeam> {
    let mut sorted = teams.to_vec();
    sorted.sort_by(standings_order);

    let mut ranked: Vec<RankedTeam> = Vec::with_capacity(sorted.len());
    for (index, team) in sorted.into_iter().enumerate() {
        let place = match ranked.last() {
            Some(prev) if prev.team.points() == team.points() => prev.place,
            _ => index as u32 + 1,
        };
        ranked.push(RankedTeam { team, place });
    }
    ranked
}

/// The first team holding first place, if any.
pub fn winner(standings: &[RankedTeam]) -> Option<&RankedTeam> {
    standings.iter().find(|t| t.place == 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PodiumStep {
    First,
    Second,
    Third,
}

impl PodiumStep {
    pub fn place(&self) -> u32 {
        match self {
            PodiumStep::First => 1,
            PodiumStep::Second => 2,
            PodiumStep::Third => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PodiumSlot<'a> {
    pub step: PodiumStep,
    pub team: &'a RankedTeam,
}

/// Podium display order, left to right: every second-place team, then every
/// first-place team, then every third-place team. Shared places put several
/// teams on the same step.
pub fn podium(standings: &[RankedTeam]) -> Vec<PodiumSlot<'_>> {
    [PodiumStep::Second, PodiumStep::First, PodiumStep::Third]
        .into_iter()
        .flat_map(move |step| {
            standings
                .iter()
                .filter(move |t| t.place == step.place())
                .map(move |team| PodiumSlot { step, team })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TeamId;

    fn team(id: u64, points: u32, revenue: f64) -> Team {
        Team {
            id: TeamId::Number(id),
            name: format!("Team {}", id),
            captain: "Captain".to_string(),
            total_revenue: revenue,
            points: Some(points),
            members: vec![],
        }
    }

    fn ids(teams: &[Team]) -> Vec<u64> {
        teams
            .iter()
            .map(|t| match t.id {
                TeamId::Number(n) => n,
                TeamId::Text(_) => unreachable!(),
            })
            .collect()
    }

    fn ranked_ids(ranked: &[RankedTeam]) -> Vec<u64> {
        ids(&ranked.iter().map(|r| r.team.clone()).collect::<Vec<_>>())
    }

    fn places(ranked: &[RankedTeam]) -> Vec<u32> {
        ranked.iter().map(|r| r.place).collect()
    }

    #[test]
    fn test_sort_by_points_is_stable() {
        let teams = vec![team(1, 5, 300.0), team(2, 10, 100.0), team(3, 5, 900.0)];
        let sorted = sort_by_key(&teams, SortKey::Points);
        // Team 1 and 3 tie on points; input order kept despite team 3's higher revenue
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_by_revenue() {
        let teams = vec![team(1, 5, 300.0), team(2, 10, 100.0), team(3, 5, 900.0)];
        let sorted = sort_by_key(&teams, SortKey::Revenue);
        assert_eq!(ids(&sorted), vec![3, 1, 2]);
    }

    #[test]
    fn test_standings_tie_break_by_revenue() {
        let teams = vec![team(1, 5, 300.0), team(2, 10, 100.0), team(3, 5, 900.0)];
        let ranked = compute_standings(&teams);
        assert_eq!(ranked_ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn test_equal_points_share_place_regardless_of_revenue() {
        let teams = vec![team(1, 10, 100.0), team(2, 10, 900.0), team(3, 4, 50.0)];
        let ranked = compute_standings(&teams);
        assert_eq!(ranked_ids(&ranked), vec![2, 1, 3]);
        assert_eq!(places(&ranked), vec![1, 1, 3]);
    }

    #[test]
    fn test_place_jumps_to_index_plus_one() {
        let teams = vec![
            team(1, 9, 0.0),
            team(2, 9, 0.0),
            team(3, 9, 0.0),
            team(4, 7, 0.0),
            team(5, 7, 0.0),
            team(6, 1, 0.0),
        ];
        let ranked = compute_standings(&teams);
        assert_eq!(places(&ranked), vec![1, 1, 1, 4, 4, 6]);
    }

    #[test]
    fn test_standings_preserve_length_and_are_idempotent() {
        let teams = vec![
            team(1, 3, 10.0),
            team(2, 8, 20.0),
            team(3, 3, 30.0),
            team(4, 0, 0.0),
        ];
        let first = compute_standings(&teams);
        assert_eq!(first.len(), teams.len());

        let again: Vec<Team> = first.iter().map(|r| r.team.clone()).collect();
        let second = compute_standings(&again);
        assert_eq!(first, second);
    }

    #[test]
    fn test_standings_empty() {
        assert!(compute_standings(&[]).is_empty());
    }

    #[test]
    fn test_missing_points_rank_as_zero() {
        let mut unscored = team(1, 0, 500.0);
        unscored.points = None;
        let ranked = compute_standings(&[unscored, team(2, 1, 0.0)]);
        assert_eq!(ranked_ids(&ranked), vec![2, 1]);
        assert_eq!(places(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_podium_with_co_leaders() {
        // places [1, 1, 2, 3] is not reachable with competition ranking from
        // points alone, so build the standings directly
        let standings = vec![
            RankedTeam { team: team(1, 10, 0.0), place: 1 },
            RankedTeam { team: team(2, 10, 0.0), place: 1 },
            RankedTeam { team: team(3, 8, 0.0), place: 2 },
            RankedTeam { team: team(4, 6, 0.0), place: 3 },
        ];
        let slots = podium(&standings);
        let order: Vec<(PodiumStep, u32)> = slots
            .iter()
            .map(|s| (s.step, s.team.team.points()))
            .collect();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].step, PodiumStep::Second);
        assert_eq!(slots[0].team.team.id, TeamId::Number(3));
        assert_eq!(slots[1].team.team.id, TeamId::Number(1));
        assert_eq!(slots[2].team.team.id, TeamId::Number(2));
        assert_eq!(slots[3].team.team.id, TeamId::Number(4));
        assert_eq!(order[3], (PodiumStep::Third, 6));
    }

    #[test]
    fn test_podium_from_computed_standings() {
        let teams = vec![team(1, 10, 0.0), team(2, 10, 0.0), team(3, 5, 0.0), team(4, 1, 0.0)];
        let standings = compute_standings(&teams);
        let slots = podium(&standings);
        // places are [1, 1, 3, 4]: no second place, team 3 takes the third step
        let steps: Vec<PodiumStep> = slots.iter().map(|s| s.step).collect();
        assert_eq!(
            steps,
            vec![PodiumStep::First, PodiumStep::First, PodiumStep::Third]
        );
    }

    #[test]
    fn test_winner() {
        let standings = compute_standings(&[team(1, 2, 0.0), team(2, 6, 0.0)]);
        assert_eq!(winner(&standings).unwrap().team.id, TeamId::Number(2));
        assert!(winner(&[]).is_none());
    }
}
