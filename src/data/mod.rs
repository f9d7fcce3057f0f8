pub mod error;
pub mod filter;
pub mod source;
pub mod types;

pub use error::DataError;
pub use filter::filter_teams;
pub use source::{load_game_data, DataSource};
pub use types::{
    parse_timestamp, Achievement, Challenge, GameData, Member, MemberStatus, Photo, Team, TeamId,
};
