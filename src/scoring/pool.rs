// League shape parameters and reference-pool selection.

use crate::dataset::PlayerRecord;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid league settings: {field} must be at least 1")]
pub struct LeagueError {
    pub field: &'static str,
}

/// League shape supplied per comparison: team count and roster spots per
/// team. Both are at least 1, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeagueSettings {
    pub num_teams: usize,
    pub roster_size: usize,
}

impl LeagueSettings {
    pub fn new(num_teams: usize, roster_size: usize) -> Result<Self, LeagueError> {
        if num_teams == 0 {
            return Err(LeagueError { field: "num_teams" });
        }
        if roster_size == 0 {
            return Err(LeagueError {
                field: "roster_size",
            });
        }
        Ok(Self {
            num_teams,
            roster_size,
        })
    }

    /// Total rostered players across the league; the reference-pool size.
    pub fn pool_size(&self) -> usize {
        self.num_teams * self.roster_size
    }

    /// Small-sample inflation factor applied to the within-player variance
    /// term: `2r / (2r - 1)` for roster size `r`.
    pub fn kappa(&self) -> f64 {
        let r = self.roster_size as f64;
        (2.0 * r) / (2.0 * r - 1.0)
    }
}

/// Select the reference population: the top players by composite rank,
/// capped at the league's total rostered-player count.
///
/// The sort is stable, so players with equal composite scores keep their
/// dataset order and selection is reproducible.
pub fn build_reference_pool<'a>(
    players: &'a [PlayerRecord],
    league: &LeagueSettings,
) -> Vec<&'a PlayerRecord> {
    let mut ranked: Vec<&PlayerRecord> = players.iter().collect();
    ranked.sort_by(|a, b| {
        b.composite_z
            .partial_cmp(&a.composite_z)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(league.pool_size());
    ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
