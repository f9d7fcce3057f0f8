use super::types::Team;

/// Filter teams by a search query (case-insensitive substring).
///
/// A team matches when the query appears in its name, its captain's name, or
/// the name of any member. A blank query matches every team.
pub fn filter_teams<'a>(teams: &'a [Team], query: &str) -> Vec<&'a Team> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return teams.iter().collect();
    }

    teams
        .iter()
        .filter(|team| team_matches(team, &query))
        .collect()
}

fn team_matches(team: &Team, query: &str) -> bool {
    team.name.to_lowercase().contains(query)
        || team.captain.to_lowercase().contains(query)
        || team
            .members
            .iter()
            .any(|m| m.full_name.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{Member, MemberStatus, TeamId};

    fn sample_team(id: u64, name: &str, captain: &str, members: &[&str]) -> Team {
        Team {
            id: TeamId::Number(id),
            name: name.to_string(),
            captain: captain.to_string(),
            total_revenue: 0.0,
            points: None,
            members: members
                .iter()
                .map(|n| Member {
                    full_name: n.to_string(),
                    product: String::new(),
                    revenue: 0.0,
                    status: MemberStatus::Player,
                    points: None,
                })
                .collect(),
        }
    }

    fn roster() -> Vec<Team> {
        vec![
            sample_team(1, "Polar Bears", "Ivan Smirnov", &["Ivan Smirnov", "Maria Orlova"]),
            sample_team(2, "Snow Foxes", "Elena Kuz", &["Elena Kuz", "Pavel Lebedev"]),
        ]
    }

    #[test]
    fn test_empty_query_returns_all() {
        let teams = roster();
        assert_eq!(filter_teams(&teams, "").len(), 2);
        assert_eq!(filter_teams(&teams, "   ").len(), 2);
    }

    #[test]
    fn test_matches_team_name_case_insensitive() {
        let teams = roster();
        let result = filter_teams(&teams, "POLAR");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Polar Bears");
    }

    #[test]
    fn test_matches_captain() {
        let teams = roster();
        let result = filter_teams(&teams, "elena");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Snow Foxes");
    }

    #[test]
    fn test_matches_member() {
        let teams = roster();
        let result = filter_teams(&teams, "orlova");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Polar Bears");
    }

    #[test]
    fn test_no_match() {
        let teams = roster();
        assert!(filter_teams(&teams, "penguins").is_empty());
    }
}
