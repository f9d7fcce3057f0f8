pub mod aggregates;
pub mod config;
pub mod engine;
pub mod error;
pub mod rules;
pub mod standings;
pub mod validation;

pub use aggregates::{compute_aggregates, Aggregates};
pub use config::*;
pub use engine::{derive_points, resolve_points, PointsResult, ResolvedPoints};
pub use error::RankingError;
pub use rules::{AchievementRule, RosterContext, RuleOutcome};
pub use standings::{
    compute_standings, podium, sort_by_key, winner, PodiumSlot, PodiumStep, RankedTeam, SortKey,
};
pub use validation::validate_points;
