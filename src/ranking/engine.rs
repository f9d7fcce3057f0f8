use super::config::{PointsConfig, PointsMode};
use super::rules::{build_rules, AchievementRule, RosterContext, RuleOutcome};
use crate::data::Team;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleContribution {
    pub label: String,       // e.g. "Top revenue", "Member revenue"
    pub description: String, // e.g. "2 member(s) at or above 100000 -> +2 each"
    pub points: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointsBreakdown {
    pub contributions: Vec<RuleContribution>,
    /// Rules that could not be evaluated, with the reason.
    pub unavailable: Vec<RuleContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsResult {
    pub points: u32,
    /// True when at least one configured rule lacked the data it needs.
    pub incomplete: bool,
    pub breakdown: PointsBreakdown,
}

/// Teams annotated with their final points, plus one result per team (same order).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPoints {
    pub teams: Vec<Team>,
    pub results: Vec<PointsResult>,
}

/// Evaluate every rule against one team. Member points are written into `team`.
pub fn calculate_points(
    team: &mut Team,
    rules: &[Box<dyn AchievementRule>],
    ctx: &RosterContext,
) -> PointsResult {
    let mut points = 0u32;
    let mut breakdown = PointsBreakdown::default();
    let mut member_points = vec![0u32; team.members.len()];

    for rule in rules {
        match rule.evaluate(team, ctx) {
            RuleOutcome::Awarded(award) => {
                points = points.saturating_add(award.points);
                for (slot, earned) in member_points.iter_mut().zip(award.per_member.iter()) {
                    *slot = slot.saturating_add(*earned);
                }
                breakdown.contributions.push(RuleContribution {
                    label: rule.label().to_string(),
                    description: award.description,
                    points: award.points,
                });
            }
            RuleOutcome::NotAwarded => {}
            RuleOutcome::Unavailable(reason) => {
                tracing::trace!(team = %team.name, rule = rule.label(), "rule unavailable");
                breakdown.unavailable.push(RuleContribution {
                    label: rule.label().to_string(),
                    description: reason,
                    points: 0,
                });
            }
        }
    }

    for (member, earned) in team.members.iter_mut().zip(member_points) {
        member.points = Some(earned);
    }
    team.points = Some(points);

    PointsResult {
        points,
        incomplete: !breakdown.unavailable.is_empty(),
        breakdown,
    }
}

/// Derive points for the whole roster from the configured rules.
///
/// Pure: the input is left untouched and identical input gives identical output.
pub fn derive_points(teams: &[Team], config: &PointsConfig) -> ResolvedPoints {
    let rules = build_rules(&config.rules);
    let ctx = RosterContext::from_teams(teams);

    let mut annotated = teams.to_vec();
    let results = annotated
        .iter_mut()
        .map(|team| calculate_points(team, &rules, &ctx))
        .collect();

    ResolvedPoints {
        teams: annotated,
        results,
    }
}

/// Resolve team points according to the configured mode.
///
/// `Supplied` keeps the document's points (a missing value counts as zero);
/// `Derive` recomputes them from the rules.
pub fn resolve_points(teams: &[Team], config: &PointsConfig) -> ResolvedPoints {
    match config.mode {
        PointsMode::Derive => {
            tracing::debug!(rules = config.rules.len(), "deriving team points");
            derive_points(teams, config)
        }
        PointsMode::Supplied => {
            let missing = teams.iter().filter(|t| t.points.is_none()).count();
            if missing > 0 {
                tracing::warn!(missing, "teams without supplied points count as zero");
            }
            let results = teams
                .iter()
                .map(|team| PointsResult {
                    points: team.points(),
                    incomplete: false,
                    breakdown: PointsBreakdown::default(),
                })
                .collect();
            ResolvedPoints {
                teams: teams.to_vec(),
                results,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Member, MemberStatus, TeamId};
    use crate::ranking::config::RuleConfig;

    fn sample_team(id: u64, revenue: f64, member_revenues: &[f64]) -> Team {
        Team {
            id: TeamId::Number(id),
            name: format!("Team {}", id),
            captain: "Captain".to_string(),
            total_revenue: revenue,
            points: None,
            members: member_revenues
                .iter()
                .enumerate()
                .map(|(i, r)| Member {
                    full_name: format!("Member {}", i),
                    product: "Cards".to_string(),
                    revenue: *r,
                    status: if i == 0 {
                        MemberStatus::Captain
                    } else {
                        MemberStatus::Player
                    },
                    points: None,
                })
                .collect(),
        }
    }

    fn derive_config() -> PointsConfig {
        PointsConfig {
            mode: PointsMode::Derive,
            ..PointsConfig::default()
        }
    }

    #[test]
    fn test_revenue_bonus_goes_to_max_team_only() {
        let teams = vec![sample_team(1, 100.0, &[]), sample_team(2, 200.0, &[])];
        let resolved = derive_points(&teams, &derive_config());
        assert_eq!(resolved.results[0].points, 0);
        assert_eq!(resolved.results[1].points, 5);
        assert_eq!(resolved.teams[1].points, Some(5));
    }

    #[test]
    fn test_revenue_bonus_shared_by_tied_teams() {
        let teams = vec![sample_team(1, 200.0, &[]), sample_team(2, 200.0, &[])];
        let resolved = derive_points(&teams, &derive_config());
        assert_eq!(resolved.results[0].points, 5);
        assert_eq!(resolved.results[1].points, 5);
    }

    #[test]
    fn test_member_bonus_counts_one_qualifying_member() {
        let teams = vec![
            sample_team(1, 200_000.0, &[150_000.0, 50_000.0]),
            sample_team(2, 300_000.0, &[]),
        ];
        let resolved = derive_points(&teams, &derive_config());
        assert_eq!(resolved.results[0].points, 2);
        assert_eq!(resolved.teams[0].members[0].points, Some(2));
        assert_eq!(resolved.teams[0].members[1].points, Some(0));
    }

    #[test]
    fn test_both_bonuses_stack() {
        let teams = vec![sample_team(1, 300_000.0, &[150_000.0, 150_000.0])];
        let resolved = derive_points(&teams, &derive_config());
        // +5 top revenue, +2 per qualifying member
        assert_eq!(resolved.results[0].points, 9);
        assert_eq!(resolved.results[0].breakdown.contributions.len(), 2);
        assert!(!resolved.results[0].incomplete);
    }

    #[test]
    fn test_derive_ignores_supplied_points() {
        let mut team = sample_team(1, 0.0, &[]);
        team.points = Some(42);
        let resolved = derive_points(&[team], &derive_config());
        assert_eq!(resolved.results[0].points, 0);
        assert_eq!(resolved.teams[0].points, Some(0));
    }

    #[test]
    fn test_derive_is_deterministic_and_pure() {
        let teams = vec![
            sample_team(1, 120_000.0, &[120_000.0]),
            sample_team(2, 90_000.0, &[90_000.0]),
        ];
        let first = derive_points(&teams, &derive_config());
        let second = derive_points(&teams, &derive_config());
        assert_eq!(first, second);
        // Input untouched
        assert_eq!(teams[0].points, None);
        assert_eq!(teams[0].members[0].points, None);
    }

    #[test]
    fn test_unavailable_rule_marks_incomplete() {
        let config = PointsConfig {
            mode: PointsMode::Derive,
            rules: vec![
                RuleConfig::TopRevenue { points: 5 },
                RuleConfig::LeadGeneration { points: 3 },
            ],
        };
        let teams = vec![sample_team(1, 10.0, &[])];
        let resolved = derive_points(&teams, &config);
        assert_eq!(resolved.results[0].points, 5);
        assert!(resolved.results[0].incomplete);
        assert_eq!(resolved.results[0].breakdown.unavailable.len(), 1);
        assert_eq!(resolved.results[0].breakdown.unavailable[0].label, "Lead generation");
    }

    #[test]
    fn test_supplied_mode_trusts_document() {
        let mut a = sample_team(1, 500_000.0, &[200_000.0]);
        a.points = Some(7);
        let b = sample_team(2, 0.0, &[]);
        let resolved = resolve_points(&[a, b], &PointsConfig::default());
        assert_eq!(resolved.results[0].points, 7);
        assert_eq!(resolved.results[1].points, 0);
        assert_eq!(resolved.teams[0].points, Some(7));
        assert_eq!(resolved.teams[1].points, None);
    }

    #[test]
    fn test_resolve_switches_on_mode() {
        let teams = vec![sample_team(1, 10.0, &[])];
        let resolved = resolve_points(&teams, &derive_config());
        assert_eq!(resolved.results[0].points, 5);
    }

    #[test]
    fn test_empty_roster_derives_nothing() {
        let resolved = derive_points(&[], &derive_config());
        assert!(resolved.teams.is_empty());
        assert!(resolved.results.is_empty());
    }
}
