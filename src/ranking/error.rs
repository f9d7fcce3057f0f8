use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankingError {
    #[error("No teams in the roster - averages are undefined")]
    EmptyRoster,
}
