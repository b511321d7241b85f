//! Identifier lookup tables
//!
//! Two CSV tables from the djblechn-su/nba-player-team-ids repository map
//! basketball-reference team abbreviations and player names to the numeric
//! identifiers stats.nba.com uses. Both are fetched once at startup and held
//! in memory for the run.

use crate::data::scrapers::bbref::RosterRow;
use crate::{CollectError, DataSource, PlayerId, Result, TeamId};
use deunicode::deunicode;

const TABLE_BASE_URL: &str =
    "https://raw.githubusercontent.com/djblechn-su/nba-player-team-ids/master/";
const TEAM_TABLE: &str = "NBA_Team_IDs.csv";
const PLAYER_TABLE: &str = "NBA_Player_IDs.csv";

/// basketball-reference lists the Charlotte Hornets as CHO, but the team
/// table keys the franchise under its earlier CHA abbreviation. The current
/// franchise ID is pinned here.
const TEAM_OVERRIDES: &[(&str, i64)] = &[("CHO", 1_610_612_766)];

#[derive(Debug, Clone)]
struct TeamRecord {
    abbreviation: String,
    id: i64,
}

#[derive(Debug, Clone)]
struct PlayerRecord {
    bbref_name: String,
    nba_name: String,
    espn_name: String,
    id: i64,
}

/// In-memory team and player lookup tables
#[derive(Debug, Clone)]
pub struct IdDirectory {
    teams: Vec<TeamRecord>,
    players: Vec<PlayerRecord>,
}

impl IdDirectory {
    /// Download both lookup tables.
    pub fn fetch(client: &reqwest::blocking::Client) -> Result<Self> {
        log::info!("Fetching identifier tables from {}", TABLE_BASE_URL);
        let team_csv = fetch_table(client, TEAM_TABLE)?;
        let player_csv = fetch_table(client, PLAYER_TABLE)?;
        let directory = Self::from_csv(&team_csv, &player_csv)?;
        log::info!(
            "Loaded {} teams and {} players",
            directory.teams.len(),
            directory.players.len()
        );
        Ok(directory)
    }

    /// Build the directory from raw CSV text (split out for testing).
    pub fn from_csv(team_csv: &str, player_csv: &str) -> Result<Self> {
        Ok(IdDirectory {
            teams: parse_team_table(team_csv)?,
            players: parse_player_table(player_csv)?,
        })
    }

    /// Resolve a basketball-reference team abbreviation to its franchise ID.
    ///
    /// Hardcoded overrides are consulted before the table; no match is a
    /// sentinel `None`, never an error.
    pub fn resolve_team(&self, abbrev: &str) -> Option<TeamId> {
        if let Some(&(_, id)) = TEAM_OVERRIDES.iter().find(|(a, _)| *a == abbrev) {
            return Some(TeamId(id));
        }
        self.teams
            .iter()
            .find(|team| team.abbreviation == abbrev)
            .map(|team| TeamId(team.id))
    }

    /// Resolve a player name to its stats.nba.com ID.
    ///
    /// The input is ASCII-folded before matching; table rows are scanned in
    /// order and a row matches on its basketball-reference name or either
    /// alias column.
    pub fn resolve_player(&self, name: &str) -> Option<PlayerId> {
        let name = deunicode(name);
        self.players
            .iter()
            .find(|p| p.bbref_name == name || p.nba_name == name || p.espn_name == name)
            .map(|p| PlayerId(p.id))
    }

    /// Resolve a roster row's team abbreviation and player name. Pure
    /// lookup; either side may come back `None`.
    pub fn resolve_row(&self, row: &RosterRow) -> (Option<TeamId>, Option<PlayerId>) {
        (self.resolve_team(&row.team), self.resolve_player(&row.name))
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

fn fetch_table(client: &reqwest::blocking::Client, table: &str) -> Result<String> {
    let url = format!("{}{}", TABLE_BASE_URL, table);
    let response = client.get(&url).send()?;
    if !response.status().is_success() {
        return Err(CollectError::Source {
            source: DataSource::IdTables,
            message: format!("HTTP {}: {}", response.status(), url),
        });
    }
    Ok(response.text()?)
}

fn parse_team_table(text: &str) -> Result<Vec<TeamRecord>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let abbrev_col = column_index(&mut reader, "BBRef_Team_Abbreviation")?;
    let id_col = column_index(&mut reader, "NBA_Current_Link_ID")?;

    let mut teams = Vec::new();
    for record in reader.records() {
        let record = record?;
        let abbreviation = record.get(abbrev_col).unwrap_or("").to_string();
        match record.get(id_col).and_then(parse_id) {
            Some(id) => teams.push(TeamRecord { abbreviation, id }),
            None => log::warn!("Dropping team row without numeric ID: {}", abbreviation),
        }
    }
    Ok(teams)
}

fn parse_player_table(text: &str) -> Result<Vec<PlayerRecord>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let bbref_col = column_index(&mut reader, "BBRefName")?;
    let nba_col = column_index(&mut reader, "NBAName")?;
    let espn_col = column_index(&mut reader, "ESPNName")?;
    let id_col = column_index(&mut reader, "NBAID")?;

    let mut players = Vec::new();
    for record in reader.records() {
        let record = record?;
        let bbref_name = record.get(bbref_col).unwrap_or("").to_string();
        match record.get(id_col).and_then(parse_id) {
            Some(id) => players.push(PlayerRecord {
                bbref_name,
                nba_name: record.get(nba_col).unwrap_or("").to_string(),
                espn_name: record.get(espn_col).unwrap_or("").to_string(),
                id,
            }),
            None => log::debug!("Dropping player row without numeric ID: {}", bbref_name),
        }
    }
    Ok(players)
}

/// Position of a named column; the column names are a contract with the
/// remote tables, so a missing one is a structural failure.
fn column_index<R: std::io::Read>(reader: &mut csv::Reader<R>, name: &str) -> Result<usize> {
    reader
        .headers()?
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| CollectError::Parse(format!("ID table is missing column {:?}", name)))
}

/// Numeric ID cell. Some exports carry float formatting ("1610612766.0"),
/// so integer parsing falls back to a float parse.
fn parse_id(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<i64>()
        .ok()
        .or_else(|| cell.parse::<f64>().ok().map(|f| f as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAM_CSV: &str = "\
BBRef_Team_Abbreviation,BBRef_Team_Name,NBA_Current_Link_ID
ATL,Atlanta Hawks,1610612737
CHA,Charlotte Hornets,1610612766
DEN,Denver Nuggets,1610612743
SEA,Seattle SuperSonics,
";

    const PLAYER_CSV: &str = "\
BBRefName,NBAName,ESPNName,NBAID
LeBron James,LeBron James,LeBron James,2544
Nikola Jokic,Nikola Jokic,Nikola Jokic,203999
Maurice Harkless,Moe Harkless,Maurice Harkless,203090
Nene,Nene Hilario,Nene,2403
Ghost Player,,,
";

    fn directory() -> IdDirectory {
        IdDirectory::from_csv(TEAM_CSV, PLAYER_CSV).unwrap()
    }

    #[test]
    fn test_team_lookup() {
        let dir = directory();
        assert_eq!(dir.resolve_team("ATL"), Some(TeamId(1610612737)));
        assert_eq!(dir.resolve_team("DEN"), Some(TeamId(1610612743)));
    }

    #[test]
    fn test_team_override_beats_table() {
        // CHO never appears in the table; the override must supply it
        let dir = directory();
        assert_eq!(dir.resolve_team("CHO"), Some(TeamId(1610612766)));
    }

    #[test]
    fn test_unknown_team_is_none() {
        let dir = directory();
        assert_eq!(dir.resolve_team("TOT"), None);
        assert_eq!(dir.resolve_team("XYZ"), None);
    }

    #[test]
    fn test_team_row_without_id_is_dropped() {
        let dir = directory();
        assert_eq!(dir.resolve_team("SEA"), None);
        assert_eq!(dir.team_count(), 3);
    }

    #[test]
    fn test_player_exact_name() {
        let dir = directory();
        assert_eq!(dir.resolve_player("LeBron James"), Some(PlayerId(2544)));
    }

    #[test]
    fn test_player_diacritics_folded() {
        let dir = directory();
        assert_eq!(dir.resolve_player("Nikola Joki\u{107}"), Some(PlayerId(203999)));
    }

    #[test]
    fn test_player_alias_columns() {
        let dir = directory();
        assert_eq!(dir.resolve_player("Moe Harkless"), Some(PlayerId(203090)));
        assert_eq!(dir.resolve_player("Nene Hilario"), Some(PlayerId(2403)));
    }

    #[test]
    fn test_unknown_player_is_none() {
        let dir = directory();
        assert_eq!(dir.resolve_player("No Such Player"), None);
    }

    #[test]
    fn test_player_row_without_id_is_dropped() {
        let dir = directory();
        assert_eq!(dir.resolve_player("Ghost Player"), None);
        assert_eq!(dir.player_count(), 4);
    }

    #[test]
    fn test_resolve_row() {
        let dir = directory();
        let row = RosterRow {
            name: "Nikola Joki\u{107}".to_string(),
            team: "CHO".to_string(),
            cells: vec![],
        };
        let (team, player) = dir.resolve_row(&row);
        assert_eq!(team, Some(TeamId(1610612766)));
        assert_eq!(player, Some(PlayerId(203999)));

        let row = RosterRow {
            name: "LeBron James".to_string(),
            team: "TOT".to_string(),
            cells: vec![],
        };
        let (team, player) = dir.resolve_row(&row);
        assert_eq!(team, None);
        assert_eq!(player, Some(PlayerId(2544)));
    }

    #[test]
    fn test_float_formatted_id() {
        assert_eq!(parse_id("1610612766.0"), Some(1610612766));
        assert_eq!(parse_id("2544"), Some(2544));
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("NA"), None);
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let bad = "Abbrev,ID\nATL,1\n";
        let err = IdDirectory::from_csv(bad, PLAYER_CSV).unwrap_err();
        assert!(matches!(err, CollectError::Parse(_)));
    }
}
