//! basketball-reference.com roster scraper
//!
//! Parses the season per-game statistics page. The source marks rows carrying
//! a player's complete season line with the `full_table` class; partial rows
//! (mid-season splits) repeat the player and are excluded. Repeated header
//! rows inside the table body carry the `thead` class and supply the column
//! names.

use crate::{CollectError, DataSource, Result, Season};
use scraper::{Html, Selector};

const ROSTER_URL_BASE: &str = "https://www.basketball-reference.com/leagues";

/// One player's per-game line for a season.
///
/// `cells` holds every data cell in page order (the rank column is not a data
/// cell); the player name is already stripped of the `*` marker.
#[derive(Debug, Clone)]
pub struct RosterRow {
    pub name: String,
    pub team: String,
    pub cells: Vec<String>,
}

/// The parsed roster table for one season
#[derive(Debug, Clone)]
pub struct SeasonRoster {
    pub columns: Vec<String>,
    pub rows: Vec<RosterRow>,
}

impl SeasonRoster {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Scraper for the basketball-reference per-game pages
pub struct RosterScraper {
    client: reqwest::blocking::Client,
}

impl RosterScraper {
    pub fn new(timeout_secs: u64) -> Self {
        RosterScraper {
            client: super::build_client(timeout_secs),
        }
    }

    /// Fetch and parse the roster for a season.
    ///
    /// Transport and structural failures are errors; the caller treats them
    /// as fatal for the season.
    pub fn fetch_season(&self, season: Season) -> Result<SeasonRoster> {
        let url = format!("{}/NBA_{}_per_game.html", ROSTER_URL_BASE, season);
        log::debug!("Fetching {}", url);

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(CollectError::Source {
                source: DataSource::BasketballReference,
                message: format!("HTTP {}: {}", response.status(), url),
            });
        }
        let html = response.text()?;
        Self::parse_page(&html)
    }

    /// Parse a per-game page (split out so fixture HTML can be fed directly).
    pub fn parse_page(html: &str) -> Result<SeasonRoster> {
        let document = Html::parse_document(html);

        let header_selector = Selector::parse("tr.thead").unwrap();
        let th_selector = Selector::parse("th").unwrap();
        let row_selector = Selector::parse("tr.full_table").unwrap();
        let td_selector = Selector::parse("td").unwrap();

        // Column names come from the first repeated header row, minus the
        // leading rank column.
        let header_row = document.select(&header_selector).next().ok_or_else(|| {
            CollectError::Parse("per-game page has no header row".to_string())
        })?;
        let columns: Vec<String> = header_row
            .select(&th_selector)
            .map(|th| th.text().collect::<String>().trim().to_string())
            .skip(1)
            .collect();

        let player_col = column_position(&columns, "Player")?;
        let team_col = column_position(&columns, "Tm")?;

        let mut rows = Vec::new();
        for tr in document.select(&row_selector) {
            let mut cells: Vec<String> = tr
                .select(&td_selector)
                .map(|td| td.text().collect::<String>().trim().to_string())
                .collect();

            if cells.len() != columns.len() {
                log::debug!("Dropping malformed roster row ({} cells)", cells.len());
                continue;
            }

            // Hall-of-Fame marker decorates some names
            cells[player_col] = cells[player_col].replace('*', "");

            rows.push(RosterRow {
                name: cells[player_col].clone(),
                team: cells[team_col].clone(),
                cells,
            });
        }

        log::debug!("Parsed {} roster rows", rows.len());
        Ok(SeasonRoster { columns, rows })
    }
}

fn column_position(columns: &[String], name: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| CollectError::Parse(format!("per-game page has no {:?} column", name)))
}
