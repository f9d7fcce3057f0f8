use super::error::DataError;
use super::types::GameData;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where the game document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Anything starting with http:// or https:// is fetched, everything else is a local path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Load and parse the game document. Called once per session and on explicit reload.
/// There is no retry: any failure is returned to the caller as-is.
pub async fn load_game_data(source: &DataSource) -> Result<GameData, DataError> {
    tracing::debug!(source = %source, "loading game data");

    let body = match source {
        DataSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DataError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?
        }
        DataSource::Url(url) => fetch_body(url).await.map_err(|e| DataError::Network {
            url: url.clone(),
            source: e,
        })?,
    };

    let data: GameData = serde_json::from_str(&body).map_err(|e| DataError::Parse {
        origin: source.to_string(),
        source: e,
    })?;

    tracing::info!(
        teams = data.teams.len(),
        challenges = data.challenges.len(),
        photos = data.photos.len(),
        "game data loaded"
    );

    Ok(data)
}

async fn fetch_body(url: &str) -> Result<String, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}
