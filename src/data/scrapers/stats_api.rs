//! stats.nba.com shot-chart client
//!
//! Requests every field-goal attempt for one player on one team in one
//! regular season via the `shotchartdetail` endpoint. The endpoint rejects
//! requests without browser-style headers, so the client masquerades the way
//! the official site does.

use crate::{CollectError, DataSource, PlayerId, Result, Season, TeamId};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const SHOT_CHART_URL: &str = "https://stats.nba.com/stats/shotchartdetail";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// One player's shot attempts as a tabular block
#[derive(Debug, Clone)]
pub struct ShotTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ShotTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct ShotChartResponse {
    #[serde(rename = "resultSets")]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

/// Client for the shot-chart endpoint
pub struct ShotChartClient {
    client: reqwest::blocking::Client,
}

impl ShotChartClient {
    pub fn new(timeout_secs: u64) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
        headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
        headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        ShotChartClient { client }
    }

    /// Fetch all regular-season field-goal attempts for a player on a team.
    ///
    /// Transport, status and decode failures all surface as a single `Err`;
    /// an empty table is a valid result.
    pub fn fetch_shots(&self, team: TeamId, player: PlayerId, season: Season) -> Result<ShotTable> {
        let params = [
            ("ContextMeasure", "FGA".to_string()),
            ("LastNGames", "0".to_string()),
            ("LeagueID", "00".to_string()),
            ("Month", "0".to_string()),
            ("OpponentTeamID", "0".to_string()),
            ("Period", "0".to_string()),
            ("PlayerID", player.0.to_string()),
            ("PlayerPosition", String::new()),
            ("RookieYear", String::new()),
            ("Season", season.label()),
            ("SeasonSegment", String::new()),
            ("SeasonType", "Regular Season".to_string()),
            ("TeamID", team.0.to_string()),
            ("VsConference", String::new()),
            ("VsDivision", String::new()),
        ];

        let response = self.client.get(SHOT_CHART_URL).query(&params).send()?;
        if !response.status().is_success() {
            return Err(CollectError::Source {
                source: DataSource::StatsApi,
                message: format!("HTTP {} for {}", response.status(), player),
            });
        }

        let body = response.text()?;
        Self::parse_response(&body)
    }

    /// Decode a shot-chart response body (split out for fixture tests).
    ///
    /// The contract is a `resultSets` list whose first entry carries the
    /// shot detail headers and rows; the trailing league-averages set is
    /// ignored.
    pub fn parse_response(body: &str) -> Result<ShotTable> {
        let parsed: ShotChartResponse = serde_json::from_str(body)?;
        let detail = parsed.result_sets.into_iter().next().ok_or_else(|| {
            CollectError::Parse("shot chart response has no result sets".to_string())
        })?;
        log::debug!("Result set {} with {} rows", detail.name, detail.row_set.len());

        let rows = detail
            .row_set
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        Ok(ShotTable {
            headers: detail.headers,
            rows,
        })
    }
}

/// Render a response scalar as CSV cell text. Nulls become empty cells.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
