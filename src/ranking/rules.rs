use super::config::RuleConfig;
use crate::data::Team;

/// Roster-wide facts a rule may need while judging a single team.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterContext {
    pub max_revenue: f64,
}

impl RosterContext {
    pub fn from_teams(teams: &[Team]) -> Self {
        let max_revenue = teams
            .iter()
            .map(|t| t.total_revenue)
            .fold(f64::NEG_INFINITY, f64::max);
        Self { max_revenue }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Award {
    pub points: u32,
    pub description: String,
    /// Points earned by each member, aligned with `Team::members`. Empty for team-level rules.
    pub per_member: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Awarded(Award),
    NotAwarded,
    /// The rule needs input the roster does not carry.
    Unavailable(String),
}

pub trait AchievementRule {
    fn label(&self) -> &str;
    fn evaluate(&self, team: &Team, ctx: &RosterContext) -> RuleOutcome;
}

pub struct TopRevenueRule {
    pub points: u32,
}

impl AchievementRule for TopRevenueRule {
    fn label(&self) -> &str {
        "Top revenue"
    }

    fn evaluate(&self, team: &Team, ctx: &RosterContext) -> RuleOutcome {
        // Every team tied at the maximum gets the bonus; a zero maximum awards nobody.
        if ctx.max_revenue > 0.0 && team.total_revenue == ctx.max_revenue {
            RuleOutcome::Awarded(Award {
                points: self.points,
                description: format!("highest revenue ({:.0}) -> +{}", team.total_revenue, self.points),
                per_member: Vec::new(),
            })
        } else {
            RuleOutcome::NotAwarded
        }
    }
}

pub struct MemberRevenueRule {
    pub points: u32,
    pub threshold: f64,
}

impl AchievementRule for MemberRevenueRule {
    fn label(&self) -> &str {
        "Member revenue"
    }

    fn evaluate(&self, team: &Team, _ctx: &RosterContext) -> RuleOutcome {
        let per_member: Vec<u32> = team
            .members
            .iter()
            .map(|m| if m.revenue >= self.threshold { self.points } else { 0 })
            .collect();
        let qualifying = per_member.iter().filter(|p| **p > 0).count();

        if qualifying == 0 {
            return RuleOutcome::NotAwarded;
        }

        let points = per_member.iter().fold(0u32, |acc, p| acc.saturating_add(*p));
        RuleOutcome::Awarded(Award {
            points,
            description: format!(
                "{} member(s) at or above {:.0} -> +{} each",
                qualifying, self.threshold, self.points
            ),
            per_member,
        })
    }
}

/// A rule that depends on deal or lead history. The roster document does not
/// include that history, so evaluation always reports the gap.
pub struct ActivityRule {
    pub label: &'static str,
    pub points: u32,
    pub requires: &'static str,
}

impl AchievementRule for ActivityRule {
    fn label(&self) -> &str {
        self.label
    }

    fn evaluate(&self, _team: &Team, _ctx: &RosterContext) -> RuleOutcome {
        RuleOutcome::Unavailable(format!("requires {} (worth +{})", self.requires, self.points))
    }
}

/// Instantiate the rule implementations for a configured rule list, preserving order.
pub fn build_rules(configs: &[RuleConfig]) -> Vec<Box<dyn AchievementRule>> {
    configs
        .iter()
        .map(|config| -> Box<dyn AchievementRule> {
            match *config {
                RuleConfig::TopRevenue { points } => Box::new(TopRevenueRule { points }),
                RuleConfig::MemberRevenue { points, threshold } => {
                    Box::new(MemberRevenueRule { points, threshold })
                }
                RuleConfig::FastClose { points } => Box::new(ActivityRule {
                    label: "Fast close",
                    points,
                    requires: "deal close timings",
                }),
                RuleConfig::LeadGeneration { points } => Box::new(ActivityRule {
                    label: "Lead generation",
                    points,
                    requires: "lead records",
                }),
                RuleConfig::CrossSell { points } => Box::new(ActivityRule {
                    label: "Cross sell",
                    points,
                    requires: "per-client product history",
                }),
            }
        })
        .collect()
}
