//! Season collection loop
//!
//! Drives one season start-to-finish: fetch the roster, resolve each row,
//! fetch shot charts for resolved rows, accumulate by team and write the
//! season artifacts. Per-row failures never cross the row boundary; a roster
//! fetch failure is fatal to its season only.

use crate::data::ids::IdDirectory;
use crate::data::output::{self, ShotAccumulator};
use crate::data::scrapers;
use crate::data::scrapers::bbref::{RosterRow, RosterScraper, SeasonRoster};
use crate::data::scrapers::stats_api::{ShotChartClient, ShotTable};
use crate::{Config, PlayerId, Result, Season, TeamId};
use std::fmt;
use std::path::Path;

/// Source of per-player shot tables. The row loop only needs this one call,
/// which keeps it testable without a live endpoint.
pub trait ShotSource {
    fn fetch_shots(&self, team: TeamId, player: PlayerId, season: Season) -> Result<ShotTable>;
}

impl ShotSource for ShotChartClient {
    fn fetch_shots(&self, team: TeamId, player: PlayerId, season: Season) -> Result<ShotTable> {
        ShotChartClient::fetch_shots(self, team, player, season)
    }
}

/// Outcome of processing one roster row
#[derive(Debug)]
pub enum RowOutcome {
    /// Both IDs resolved and the fetch returned at least one shot
    Collected(ShotTable),
    /// Both IDs resolved but the player has no recorded attempts
    NoShots,
    /// Team or player did not resolve; nothing was fetched
    Unresolved {
        team_id: Option<TeamId>,
        player_id: Option<PlayerId>,
    },
    /// Fetch or decode failed after resolution
    FetchFailed(String),
}

/// Resolve one roster row and fetch its shot table. No error escapes the
/// row boundary.
pub fn process_row(
    directory: &IdDirectory,
    source: &impl ShotSource,
    season: Season,
    row: &RosterRow,
) -> RowOutcome {
    let (team_id, player_id) = directory.resolve_row(row);

    let (Some(team), Some(player)) = (team_id, player_id) else {
        return RowOutcome::Unresolved { team_id, player_id };
    };

    match source.fetch_shots(team, player, season) {
        Ok(table) if table.is_empty() => RowOutcome::NoShots,
        Ok(table) => RowOutcome::Collected(table),
        Err(e) => RowOutcome::FetchFailed(e.to_string()),
    }
}

/// Per-season counters for the closing log line
#[derive(Debug, Default, Clone, Copy)]
pub struct SeasonSummary {
    pub players: usize,
    pub collected: usize,
    pub unresolved: usize,
    pub failed: usize,
}

impl fmt::Display for SeasonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} players, {} collected, {} unresolved, {} failed",
            self.players, self.collected, self.unresolved, self.failed
        )
    }
}

/// Run the row loop over a parsed roster, accumulating by team abbreviation
/// in page order.
pub fn collect_rows(
    directory: &IdDirectory,
    source: &impl ShotSource,
    season: Season,
    roster: &SeasonRoster,
) -> (ShotAccumulator, SeasonSummary) {
    let mut accumulator = ShotAccumulator::new();
    let mut summary = SeasonSummary {
        players: roster.len(),
        ..SeasonSummary::default()
    };

    for row in &roster.rows {
        match process_row(directory, source, season, row) {
            RowOutcome::Collected(table) => {
                log::info!("{}: {} shots", row.name, table.len());
                accumulator.append(&row.team, table);
                summary.collected += 1;
            }
            RowOutcome::NoShots => {
                log::info!("{}: no attempts recorded", row.name);
            }
            RowOutcome::Unresolved { team_id, player_id } => {
                log::warn!(
                    "{}: invalid IDs ({}, {})",
                    row.name,
                    team_id.map(|t| t.0).unwrap_or(-1),
                    player_id.map(|p| p.0).unwrap_or(-1)
                );
                summary.unresolved += 1;
            }
            RowOutcome::FetchFailed(message) => {
                log::warn!("{}: couldn't get shots in {}: {}", row.name, season, message);
                summary.failed += 1;
            }
        }
    }

    (accumulator, summary)
}

/// Collect one season end-to-end and write its artifacts.
pub fn collect_season(
    directory: &IdDirectory,
    roster_scraper: &RosterScraper,
    source: &impl ShotSource,
    out_dir: &Path,
    season: Season,
) -> Result<SeasonSummary> {
    log::info!("Season {}", season);

    let roster = roster_scraper.fetch_season(season)?;
    output::write_roster(out_dir, season, &roster)?;

    let (accumulator, summary) = collect_rows(directory, source, season, &roster);
    accumulator.write_all(out_dir, season)?;

    log::info!("Season {} done: {}", season, summary);
    Ok(summary)
}

/// Collect every configured season in order. A failed season is logged and
/// the run continues with the next one.
pub fn run(config: &Config) -> Result<()> {
    let client = scrapers::build_client(config.http.timeout_secs);
    let directory = IdDirectory::fetch(&client)?;

    let roster_scraper = RosterScraper::new(config.http.timeout_secs);
    let shot_client = ShotChartClient::new(config.http.timeout_secs);
    let out_dir = Path::new(&config.output.dir);

    for season in config.season_range() {
        if let Err(e) = collect_season(&directory, &roster_scraper, &shot_client, out_dir, season)
        {
            log::warn!("Season {} failed: {}", season, e);
        }
    }

    Ok(())
}
