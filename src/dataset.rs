// Player dataset loading and validation.
//
// Reads the season summary CSV: one row per player with season totals and
// per-game averages for the nine scoring categories, a precomputed composite
// rank score, and per-week sequences encoded as JSON array strings
// (e.g. `"[20, 22, 24]"`). All shape validation happens here, once, so the
// scoring engine can assume a consistent snapshot.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

// ---------------------------------------------------------------------------
// Stat selectors
// ---------------------------------------------------------------------------

/// One of the seven counting categories tracked per week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountingStat {
    ThreePointersMade,
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
}

/// One of the two percentage categories, backed by a makes/attempts pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PercentageStat {
    FieldGoals,
    FreeThrows,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Per-week totals for one player. Every sequence has the same length (the
/// schedule week count), enforced at load time.
#[derive(Debug, Clone)]
pub struct WeeklyLog {
    pub threes: Vec<f64>,
    pub points: Vec<f64>,
    pub rebounds: Vec<f64>,
    pub assists: Vec<f64>,
    pub steals: Vec<f64>,
    pub blocks: Vec<f64>,
    pub turnovers: Vec<f64>,
    pub fg_made: Vec<f64>,
    pub fg_attempted: Vec<f64>,
    pub ft_made: Vec<f64>,
    pub ft_attempted: Vec<f64>,
}

impl WeeklyLog {
    /// All sequences paired with their CSV column names, for validation and
    /// error messages.
    fn columns(&self) -> [(&'static str, &[f64]); 11] {
        [
            ("weekly_three_pointers_made", &self.threes),
            ("weekly_points", &self.points),
            ("weekly_rebounds", &self.rebounds),
            ("weekly_assists", &self.assists),
            ("weekly_steals", &self.steals),
            ("weekly_blocks", &self.blocks),
            ("weekly_turnovers", &self.turnovers),
            ("weekly_field_goals_made", &self.fg_made),
            ("weekly_field_goals_attempted", &self.fg_attempted),
            ("weekly_free_throws_made", &self.ft_made),
            ("weekly_free_throws_attempted", &self.ft_attempted),
        ]
    }
}

/// One player-season row.
///
/// The season per-game averages are carried for raw-stat display only; the
/// scoring engine recomputes weekly means from the `WeeklyLog` directly.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub name: String,
    /// Precomputed overall composite rank, used only for reference-pool
    /// selection.
    pub composite_z: f64,
    pub fg_made: f64,
    pub fg_attempted: f64,
    pub fg_pct: f64,
    pub ft_made: f64,
    pub ft_attempted: f64,
    pub ft_pct: f64,
    pub avg_threes: f64,
    pub avg_points: f64,
    pub avg_rebounds: f64,
    pub avg_assists: f64,
    pub avg_steals: f64,
    pub avg_blocks: f64,
    pub avg_turnovers: f64,
    pub weekly: WeeklyLog,
}

impl PlayerRecord {
    /// Weekly totals for a counting category.
    pub fn weekly(&self, stat: CountingStat) -> &[f64] {
        match stat {
            CountingStat::ThreePointersMade => &self.weekly.threes,
            CountingStat::Points => &self.weekly.points,
            CountingStat::Rebounds => &self.weekly.rebounds,
            CountingStat::Assists => &self.weekly.assists,
            CountingStat::Steals => &self.weekly.steals,
            CountingStat::Blocks => &self.weekly.blocks,
            CountingStat::Turnovers => &self.weekly.turnovers,
        }
    }

    /// Season per-game average for a counting category (display only).
    pub fn season_avg(&self, stat: CountingStat) -> f64 {
        match stat {
            CountingStat::ThreePointersMade => self.avg_threes,
            CountingStat::Points => self.avg_points,
            CountingStat::Rebounds => self.avg_rebounds,
            CountingStat::Assists => self.avg_assists,
            CountingStat::Steals => self.avg_steals,
            CountingStat::Blocks => self.avg_blocks,
            CountingStat::Turnovers => self.avg_turnovers,
        }
    }

    pub fn weekly_made(&self, stat: PercentageStat) -> &[f64] {
        match stat {
            PercentageStat::FieldGoals => &self.weekly.fg_made,
            PercentageStat::FreeThrows => &self.weekly.ft_made,
        }
    }

    pub fn weekly_attempted(&self, stat: PercentageStat) -> &[f64] {
        match stat {
            PercentageStat::FieldGoals => &self.weekly.fg_attempted,
            PercentageStat::FreeThrows => &self.weekly.ft_attempted,
        }
    }

    pub fn season_made(&self, stat: PercentageStat) -> f64 {
        match stat {
            PercentageStat::FieldGoals => self.fg_made,
            PercentageStat::FreeThrows => self.ft_made,
        }
    }

    pub fn season_attempted(&self, stat: PercentageStat) -> f64 {
        match stat {
            PercentageStat::FieldGoals => self.fg_attempted,
            PercentageStat::FreeThrows => self.ft_attempted,
        }
    }

    /// Precomputed season shooting rate. The scoring engine uses this value
    /// as-is rather than recomputing it from the weekly log.
    pub fn season_rate(&self, stat: PercentageStat) -> f64 {
        match stat {
            PercentageStat::FieldGoals => self.fg_pct,
            PercentageStat::FreeThrows => self.ft_pct,
        }
    }
}

/// The loaded dataset: players in file order plus a name index.
///
/// Loaded once at startup and only ever borrowed immutably afterwards, so it
/// can be shared freely across threads behind an `Arc` if a front end needs
/// concurrent request handling.
#[derive(Debug, Clone)]
pub struct Dataset {
    players: Vec<PlayerRecord>,
    by_name: HashMap<String, usize>,
    weeks: usize,
}

impl Dataset {
    /// All players, in dataset (file) order.
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    /// Look up a player by exact name.
    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.by_name.get(name).map(|&i| &self.players[i])
    }

    /// The shared length of every weekly sequence (0 for an empty dataset).
    pub fn weeks(&self) -> usize {
        self.weeks
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("data integrity error: {0}")]
    Integrity(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Summary CSV row. Weekly columns arrive as JSON array strings and are
/// parsed separately. Extra columns are absorbed via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    ascii_name: String,
    z_avg_across_9_cats: f64,
    total_field_goals_made: f64,
    total_field_goals_attempted: f64,
    fg_pct: f64,
    total_free_throws_made: f64,
    total_free_throws_attempted: f64,
    ft_pct: f64,
    avg_three_pointers_made: f64,
    avg_points: f64,
    avg_rebounds: f64,
    avg_assists: f64,
    avg_steals: f64,
    avg_blocks: f64,
    avg_turnovers: f64,
    weekly_three_pointers_made: String,
    weekly_points: String,
    weekly_rebounds: String,
    weekly_assists: String,
    weekly_steals: String,
    weekly_blocks: String,
    weekly_turnovers: String,
    weekly_field_goals_made: String,
    weekly_field_goals_attempted: String,
    weekly_free_throws_made: String,
    weekly_free_throws_attempted: String,
    /// Absorb any extra columns the summary export includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns true if all given f64 values are finite (not NaN or Infinity).
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Parse one weekly JSON array column.
fn parse_weeks(name: &str, column: &str, encoded: &str) -> Result<Vec<f64>, DatasetError> {
    let values: Vec<f64> = serde_json::from_str(encoded).map_err(|e| {
        DatasetError::Integrity(format!(
            "player '{name}', column {column}: invalid weekly array: {e}"
        ))
    })?;
    if !all_finite(&values) {
        return Err(DatasetError::Integrity(format!(
            "player '{name}', column {column}: non-finite week value"
        )));
    }
    Ok(values)
}

/// Enforce one shared week count across every sequence of every player.
fn check_weeks(
    name: &str,
    weekly: &WeeklyLog,
    expected: &mut Option<usize>,
) -> Result<(), DatasetError> {
    for (column, series) in weekly.columns() {
        match *expected {
            None => *expected = Some(series.len()),
            Some(n) if series.len() != n => {
                return Err(DatasetError::Integrity(format!(
                    "player '{name}', column {column}: expected {n} weeks, got {}",
                    series.len()
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_from_reader<R: Read>(rdr: R) -> Result<Dataset, DatasetError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players: Vec<PlayerRecord> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut weeks: Option<usize> = None;

    for result in reader.deserialize::<RawPlayerRow>() {
        let raw = result?;
        let name = raw.ascii_name.trim().to_string();
        if name.is_empty() {
            return Err(DatasetError::Integrity(format!(
                "row {}: empty ascii_name",
                players.len() + 1
            )));
        }

        let scalars = [
            raw.z_avg_across_9_cats,
            raw.total_field_goals_made,
            raw.total_field_goals_attempted,
            raw.fg_pct,
            raw.total_free_throws_made,
            raw.total_free_throws_attempted,
            raw.ft_pct,
            raw.avg_three_pointers_made,
            raw.avg_points,
            raw.avg_rebounds,
            raw.avg_assists,
            raw.avg_steals,
            raw.avg_blocks,
            raw.avg_turnovers,
        ];
        if !all_finite(&scalars) {
            return Err(DatasetError::Integrity(format!(
                "player '{name}': non-finite numeric field"
            )));
        }

        let weekly = WeeklyLog {
            threes: parse_weeks(
                &name,
                "weekly_three_pointers_made",
                &raw.weekly_three_pointers_made,
            )?,
            points: parse_weeks(&name, "weekly_points", &raw.weekly_points)?,
            rebounds: parse_weeks(&name, "weekly_rebounds", &raw.weekly_rebounds)?,
            assists: parse_weeks(&name, "weekly_assists", &raw.weekly_assists)?,
            steals: parse_weeks(&name, "weekly_steals", &raw.weekly_steals)?,
            blocks: parse_weeks(&name, "weekly_blocks", &raw.weekly_blocks)?,
            turnovers: parse_weeks(&name, "weekly_turnovers", &raw.weekly_turnovers)?,
            fg_made: parse_weeks(
                &name,
                "weekly_field_goals_made",
                &raw.weekly_field_goals_made,
            )?,
            fg_attempted: parse_weeks(
                &name,
                "weekly_field_goals_attempted",
                &raw.weekly_field_goals_attempted,
            )?,
            ft_made: parse_weeks(
                &name,
                "weekly_free_throws_made",
                &raw.weekly_free_throws_made,
            )?,
            ft_attempted: parse_weeks(
                &name,
                "weekly_free_throws_attempted",
                &raw.weekly_free_throws_attempted,
            )?,
        };
        check_weeks(&name, &weekly, &mut weeks)?;

        let record = PlayerRecord {
            name: name.clone(),
            composite_z: raw.z_avg_across_9_cats,
            fg_made: raw.total_field_goals_made,
            fg_attempted: raw.total_field_goals_attempted,
            fg_pct: raw.fg_pct,
            ft_made: raw.total_free_throws_made,
            ft_attempted: raw.total_free_throws_attempted,
            ft_pct: raw.ft_pct,
            avg_threes: raw.avg_three_pointers_made,
            avg_points: raw.avg_points,
            avg_rebounds: raw.avg_rebounds,
            avg_assists: raw.avg_assists,
            avg_steals: raw.avg_steals,
            avg_blocks: raw.avg_blocks,
            avg_turnovers: raw.avg_turnovers,
            weekly,
        };

        if by_name.insert(name.clone(), players.len()).is_some() {
            return Err(DatasetError::Integrity(format!(
                "duplicate player name '{name}'"
            )));
        }
        players.push(record);
    }

    Ok(Dataset {
        players,
        by_name,
        weeks: weeks.unwrap_or(0),
    })
}

/// Load the season summary dataset from a CSV file. All shape validation
/// happens here; scoring never re-checks.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let dataset = load_from_reader(std::io::BufReader::new(file))?;
    info!(
        "loaded {} players ({} weeks) from {}",
        dataset.len(),
        dataset.weeks(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
