use serde::{Deserialize, Serialize};

/// Where team points come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PointsMode {
    /// Trust the `points` carried by the data document.
    #[default]
    Supplied,
    /// Compute points from the configured achievement rules.
    Derive,
}

/// One achievement rule.
///
/// Example YAML:
/// ```yaml
/// - kind: top_revenue
///   points: 5
/// - kind: member_revenue
///   points: 2
///   threshold: 100000
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    /// Awarded to every team whose total revenue equals the roster maximum.
    TopRevenue { points: u32 },
    /// Awarded once per member whose revenue reaches the threshold.
    MemberRevenue { points: u32, threshold: f64 },
    /// Needs closed-deal timings, which the roster does not carry.
    FastClose { points: u32 },
    /// Needs lead data, which the roster does not carry.
    LeadGeneration { points: u32 },
    /// Needs per-client product data, which the roster does not carry.
    CrossSell { points: u32 },
}

impl RuleConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            RuleConfig::TopRevenue { .. } => "top_revenue",
            RuleConfig::MemberRevenue { .. } => "member_revenue",
            RuleConfig::FastClose { .. } => "fast_close",
            RuleConfig::LeadGeneration { .. } => "lead_generation",
            RuleConfig::CrossSell { .. } => "cross_sell",
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            RuleConfig::TopRevenue { points }
            | RuleConfig::MemberRevenue { points, .. }
            | RuleConfig::FastClose { points }
            | RuleConfig::LeadGeneration { points }
            | RuleConfig::CrossSell { points } => *points,
        }
    }
}

pub const TOP_REVENUE_BONUS: u32 = 5;
pub const MEMBER_REVENUE_BONUS: u32 = 2;
pub const MEMBER_REVENUE_THRESHOLD: f64 = 100_000.0;

fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::TopRevenue {
            points: TOP_REVENUE_BONUS,
        },
        RuleConfig::MemberRevenue {
            points: MEMBER_REVENUE_BONUS,
            threshold: MEMBER_REVENUE_THRESHOLD,
        },
    ]
}

/// Points configuration.
///
/// In `supplied` mode the rules are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PointsConfig {
    #[serde(default)]
    pub mode: PointsMode,

    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            mode: PointsMode::default(),
            rules: default_rules(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_config() {
        let config = PointsConfig::default();
        assert_eq!(config.mode, PointsMode::Supplied);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].kind(), "top_revenue");
        assert_eq!(config.rules[0].points(), 5);
        assert_eq!(config.rules[1].kind(), "member_revenue");
        assert_eq!(config.rules[1].points(), 2);
    }

    #[test]
    fn test_empty_points_config_parse() {
        let config: PointsConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, PointsConfig::default());
    }

    #[test]
    fn test_full_points_config_parse() {
        let yaml = r#"
mode: derive
rules:
  - kind: top_revenue
    points: 10
  - kind: member_revenue
    points: 3
    threshold: 50000
  - kind: cross_sell
    points: 4
"#;
        let config: PointsConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.mode, PointsMode::Derive);
        assert_eq!(config.rules.len(), 3);
        assert_eq!(
            config.rules[1],
            RuleConfig::MemberRevenue {
                points: 3,
                threshold: 50000.0
            }
        );
        assert_eq!(config.rules[2].kind(), "cross_sell");
    }

    #[test]
    fn test_points_config_serde_roundtrip() {
        let config = PointsConfig {
            mode: PointsMode::Derive,
            ..PointsConfig::default()
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: PointsConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
