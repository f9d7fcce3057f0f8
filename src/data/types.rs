use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Team identifier. Data files use plain numbers, but string ids are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamId::Number(n) => write!(f, "{}", n),
            TeamId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum MemberStatus {
    Captain,
    Player,
}

impl From<String> for MemberStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "captain" | "капитан" => MemberStatus::Captain,
            _ => MemberStatus::Player,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "fio")]
    pub full_name: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub revenue: f64,
    pub status: MemberStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

impl Member {
    pub fn is_captain(&self) -> bool {
        self.status == MemberStatus::Captain
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub captain: String,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Team {
    /// Points used for ranking. A team without points counts as zero.
    pub fn points(&self) -> u32 {
        self.points.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub from: TeamId,
    pub to: TeamId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub team: TeamId,
}

/// The whole game document as published by the organisers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub next_update: Option<String>,
}

impl GameData {
    pub fn find_team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }

    /// Display name for a team reference. Dangling ids render as "Team {id}".
    pub fn team_label(&self, id: &TeamId) -> String {
        match self.find_team(id) {
            Some(team) => team.name.clone(),
            None => format!("Team {}", id),
        }
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated.as_deref().and_then(parse_timestamp)
    }

    pub fn next_update_at(&self) -> Option<DateTime<Utc>> {
        self.next_update.as_deref().and_then(parse_timestamp)
    }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const SAMPLE: &str = r#"{
        "teams": [
            {
                "id": 1,
                "name": "Northern Lights",
                "captain": "Anna Petrova",
                "totalRevenue": 250000,
                "points": 12,
                "members": [
                    { "fio": "Anna Petrova", "product": "Deposits", "revenue": 150000, "status": "капитан" },
                    { "fio": "Oleg Ivanov", "product": "Cards", "revenue": 100000, "status": "игрок", "points": 2 }
                ]
            }
        ],
        "achievements": [ { "name": "Top seller", "description": "Highest revenue", "points": 5 } ],
        "challenges": [ { "from": 1, "to": 7, "description": "Beat us", "status": "pending" } ],
        "photos": [ { "url": "https://example.com/a.jpg", "description": "Kickoff", "team": 1 } ],
        "totalRevenue": 250000,
        "lastUpdated": "2024-12-20T10:00:00",
        "nextUpdate": "2024-12-27T10:00:00Z"
    }"#;

    #[test]
    fn test_parse_full_document() {
        let data: GameData = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(data.teams.len(), 1);
        let team = &data.teams[0];
        assert_eq!(team.id, TeamId::Number(1));
        assert_eq!(team.points(), 12);
        assert_eq!(team.members.len(), 2);
        assert!(team.members[0].is_captain());
        assert!(!team.members[1].is_captain());
        assert_eq!(team.members[0].points, None);
        assert_eq!(team.members[1].points, Some(2));
        assert_eq!(data.achievements[0].points, 5);
        assert_eq!(data.total_revenue, 250000.0);
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let data: GameData = serde_json::from_str(r#"{ "teams": [] }"#).unwrap();
        assert!(data.teams.is_empty());
        assert!(data.challenges.is_empty());
        assert!(data.photos.is_empty());
        assert!(data.achievements.is_empty());
        assert!(data.last_updated_at().is_none());
    }

    #[test]
    fn test_team_without_points_counts_as_zero() {
        let team: Team = serde_json::from_str(
            r#"{ "id": "alpha", "name": "Alpha", "captain": "A", "totalRevenue": 1, "members": [] }"#,
        )
        .unwrap();
        assert_eq!(team.id, TeamId::Text("alpha".to_string()));
        assert_eq!(team.points(), 0);
    }

    #[test]
    fn test_status_accepts_english_and_russian() {
        assert_eq!(MemberStatus::from("captain".to_string()), MemberStatus::Captain);
        assert_eq!(MemberStatus::from("Капитан".to_string()), MemberStatus::Captain);
        assert_eq!(MemberStatus::from("player".to_string()), MemberStatus::Player);
        assert_eq!(MemberStatus::from("anything".to_string()), MemberStatus::Player);
    }

    #[test]
    fn test_team_label_resolves_or_falls_back() {
        let data: GameData = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(data.team_label(&TeamId::Number(1)), "Northern Lights");
        assert_eq!(data.team_label(&TeamId::Number(7)), "Team 7");
    }

    #[test]
    fn test_parse_timestamps() {
        let data: GameData = serde_json::from_str(SAMPLE).unwrap();
        let last = data.last_updated_at().unwrap();
        assert_eq!((last.year(), last.month(), last.day()), (2024, 12, 20));
        assert_eq!(last.hour(), 10);

        let next = data.next_update_at().unwrap();
        assert_eq!(next.day(), 27);

        assert!(parse_timestamp("2024-12-20T10:00:00+03:00").is_some());
        assert!(parse_timestamp("not a date").is_none());
    }
}
