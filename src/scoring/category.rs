// Category definitions and punt-set validation.

use crate::dataset::{CountingStat, PercentageStat, PlayerRecord};
use std::collections::HashSet;
use thiserror::Error;

/// Upper bound on punted categories per comparison.
pub const MAX_PUNTS: usize = 4;

/// How a category slot is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Weekly counting total; `lower_is_better` flips the score sign so a
    /// higher G score is always the better one.
    Counting {
        stat: CountingStat,
        lower_is_better: bool,
    },
    /// Season shooting rate backed by a makes/attempts pair.
    Percentage(PercentageStat),
    /// Raw makes/attempts line shown for context; never scored.
    DisplayOnly(PercentageStat),
}

#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub label: &'static str,
    pub kind: CategoryKind,
}

/// The fixed 11-slot category table, in display order.
pub const CATEGORIES: [CategorySpec; 11] = [
    CategorySpec {
        label: "FGM/FGA",
        kind: CategoryKind::DisplayOnly(PercentageStat::FieldGoals),
    },
    CategorySpec {
        label: "FG%",
        kind: CategoryKind::Percentage(PercentageStat::FieldGoals),
    },
    CategorySpec {
        label: "FTM/FTA",
        kind: CategoryKind::DisplayOnly(PercentageStat::FreeThrows),
    },
    CategorySpec {
        label: "FT%",
        kind: CategoryKind::Percentage(PercentageStat::FreeThrows),
    },
    CategorySpec {
        label: "3PTM",
        kind: CategoryKind::Counting {
            stat: CountingStat::ThreePointersMade,
            lower_is_better: false,
        },
    },
    CategorySpec {
        label: "PTS",
        kind: CategoryKind::Counting {
            stat: CountingStat::Points,
            lower_is_better: false,
        },
    },
    CategorySpec {
        label: "REB",
        kind: CategoryKind::Counting {
            stat: CountingStat::Rebounds,
            lower_is_better: false,
        },
    },
    CategorySpec {
        label: "AST",
        kind: CategoryKind::Counting {
            stat: CountingStat::Assists,
            lower_is_better: false,
        },
    },
    CategorySpec {
        label: "STL",
        kind: CategoryKind::Counting {
            stat: CountingStat::Steals,
            lower_is_better: false,
        },
    },
    CategorySpec {
        label: "BLK",
        kind: CategoryKind::Counting {
            stat: CountingStat::Blocks,
            lower_is_better: false,
        },
    },
    CategorySpec {
        label: "TOV",
        kind: CategoryKind::Counting {
            stat: CountingStat::Turnovers,
            lower_is_better: true,
        },
    },
];

impl CategorySpec {
    /// Display-only slots carry no score and cannot be punted.
    pub fn puntable(&self) -> bool {
        !matches!(self.kind, CategoryKind::DisplayOnly(_))
    }

    /// Human-readable raw-stat summary for one player, shown next to the
    /// score column.
    pub fn raw_stat(&self, player: &PlayerRecord) -> String {
        match self.kind {
            CategoryKind::DisplayOnly(stat) => format!(
                "{}/{}",
                player.season_made(stat) as i64,
                player.season_attempted(stat) as i64
            ),
            CategoryKind::Percentage(stat) => {
                format!("{:.2}%", player.season_rate(stat) * 100.0)
            }
            CategoryKind::Counting { stat, .. } => format!("{:.2}", player.season_avg(stat)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuntError {
    #[error("at most {MAX_PUNTS} categories can be punted, got {0}")]
    TooMany(usize),

    #[error("unknown or unpuntable category `{0}`")]
    Unknown(String),
}

/// A validated set of punted category labels. Construction enforces the
/// input boundary: at most [`MAX_PUNTS`] distinct labels, all drawn from the
/// nine scorable categories.
#[derive(Debug, Clone, Default)]
pub struct PuntSet(HashSet<&'static str>);

impl PuntSet {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Result<Self, PuntError> {
        let mut set = HashSet::new();
        for label in labels {
            let label = label.as_ref();
            let spec = CATEGORIES
                .iter()
                .find(|c| c.label.eq_ignore_ascii_case(label) && c.puntable())
                .ok_or_else(|| PuntError::Unknown(label.to_string()))?;
            set.insert(spec.label);
        }
        if set.len() > MAX_PUNTS {
            return Err(PuntError::TooMany(set.len()));
        }
        Ok(PuntSet(set))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
