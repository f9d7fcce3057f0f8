use super::config::{PointsConfig, PointsMode, RuleConfig};
use std::collections::HashSet;

/// Validate points configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_points(config: &PointsConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.mode == PointsMode::Derive && config.rules.is_empty() {
        errors.push("points.rules: derive mode needs at least one rule".to_string());
    }

    let mut seen = HashSet::new();
    for (i, rule) in config.rules.iter().enumerate() {
        if !seen.insert(rule.kind()) {
            errors.push(format!(
                "points.rules[{}]: duplicate rule kind '{}'",
                i,
                rule.kind()
            ));
        }

        if let RuleConfig::MemberRevenue { threshold, .. } = rule {
            if !threshold.is_finite() || *threshold < 0.0 {
                errors.push(format!(
                    "points.rules[{}].threshold: must be a non-negative number, got {}",
                    i, threshold
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
