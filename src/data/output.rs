//! Season artifact writers
//!
//! One roster CSV per season and one CSV per (season, team) holding the
//! concatenation of that team's per-player shot tables. Artifacts live under
//! `<out_dir>/<start_year>_<two_digit_end_year>/`.

use crate::data::scrapers::bbref::SeasonRoster;
use crate::data::scrapers::stats_api::ShotTable;
use crate::{Result, Season};
use std::path::{Path, PathBuf};

/// The roster pages and the historical output layout disagree on one
/// franchise abbreviation; files for it are written under the other name.
const FILE_NAME_OVERRIDES: &[(&str, &str)] = &[("CHA", "CHO")];

/// Accumulates per-player shot tables by team for one season.
///
/// Buckets keep first-successful-append order and tables keep append order,
/// so output is stable across runs against unchanged sources.
#[derive(Debug, Default)]
pub struct ShotAccumulator {
    buckets: Vec<TeamBucket>,
}

#[derive(Debug)]
struct TeamBucket {
    team: String,
    tables: Vec<ShotTable>,
}

impl ShotAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one player's table under a team abbreviation.
    pub fn append(&mut self, team: &str, table: ShotTable) {
        match self.buckets.iter_mut().find(|b| b.team == team) {
            Some(bucket) => bucket.tables.push(table),
            None => self.buckets.push(TeamBucket {
                team: team.to_string(),
                tables: vec![table],
            }),
        }
    }

    pub fn team_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Write one concatenated CSV per team. Returns the number of files
    /// written.
    pub fn write_all(&self, out_dir: &Path, season: Season) -> Result<usize> {
        let season_dir = season_dir(out_dir, season);
        std::fs::create_dir_all(&season_dir)?;

        for bucket in &self.buckets {
            let path = season_dir.join(format!("{}.csv", file_team_name(&bucket.team)));
            let mut writer = csv::Writer::from_path(&path)?;

            if let Some(first) = bucket.tables.first() {
                writer.write_record(&first.headers)?;
            }
            for table in &bucket.tables {
                for row in &table.rows {
                    writer.write_record(row)?;
                }
            }
            writer.flush()?;
            log::info!("Wrote {}", path.display());
        }

        Ok(self.buckets.len())
    }
}

/// Write the season roster artifact, named after the season directory.
pub fn write_roster(out_dir: &Path, season: Season, roster: &SeasonRoster) -> Result<PathBuf> {
    let season_dir = season_dir(out_dir, season);
    std::fs::create_dir_all(&season_dir)?;

    let path = season_dir.join(format!("{}.csv", season.dir_name()));
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(&roster.columns)?;
    for row in &roster.rows {
        writer.write_record(&row.cells)?;
    }
    writer.flush()?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

fn season_dir(out_dir: &Path, season: Season) -> PathBuf {
    out_dir.join(season.dir_name())
}

fn file_team_name(team: &str) -> &str {
    FILE_NAME_OVERRIDES
        .iter()
        .find(|(from, _)| *from == team)
        .map(|(_, to)| *to)
        .unwrap_or(team)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::scrapers::bbref::RosterRow;

    fn table(player: &str, distances: &[&str]) -> ShotTable {
        ShotTable {
            headers: vec!["PLAYER_NAME".to_string(), "SHOT_DISTANCE".to_string()],
            rows: distances
                .iter()
                .map(|d| vec![player.to_string(), d.to_string()])
                .collect(),
        }
    }

    #[test]
    fn test_team_files_and_concatenation_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut acc = ShotAccumulator::new();
        acc.append("LAL", table("LeBron James", &["24", "3"]));
        acc.append("DEN", table("Nikola Jokic", &["8"]));
        acc.append("LAL", table("Anthony Davis", &["12"]));

        let written = acc.write_all(dir.path(), Season(2021)).unwrap();
        assert_eq!(written, 2);

        let lal = std::fs::read_to_string(dir.path().join("2020_21/LAL.csv")).unwrap();
        let lines: Vec<_> = lal.lines().collect();
        assert_eq!(lines[0], "PLAYER_NAME,SHOT_DISTANCE");
        assert_eq!(lines[1], "LeBron James,24");
        assert_eq!(lines[2], "LeBron James,3");
        assert_eq!(lines[3], "Anthony Davis,12");

        assert!(dir.path().join("2020_21/DEN.csv").exists());
    }

    #[test]
    fn test_hornets_file_name_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut acc = ShotAccumulator::new();
        acc.append("CHA", table("Kemba Walker", &["26"]));

        acc.write_all(dir.path(), Season(2015)).unwrap();
        assert!(dir.path().join("2014_15/CHO.csv").exists());
        assert!(!dir.path().join("2014_15/CHA.csv").exists());
    }

    #[test]
    fn test_roster_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let roster = SeasonRoster {
            columns: vec!["Player".to_string(), "Tm".to_string(), "PTS".to_string()],
            rows: vec![RosterRow {
                name: "LeBron James".to_string(),
                team: "LAL".to_string(),
                cells: vec![
                    "LeBron James".to_string(),
                    "LAL".to_string(),
                    "25.0".to_string(),
                ],
            }],
        };

        let path = write_roster(dir.path(), Season(2021), &roster).unwrap();
        assert!(path.ends_with("2020_21/2020_21.csv"));
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "Player,Tm,PTS\nLeBron James,LAL,25.0\n");
    }

    #[test]
    fn test_empty_accumulator_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let acc = ShotAccumulator::new();
        assert_eq!(acc.write_all(dir.path(), Season(2021)).unwrap(), 0);
    }
}
