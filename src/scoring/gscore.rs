// G-score computation: standardized per-category comparison of two players
// against a league-reference population.
//
// A G score is a z-score-like measure whose denominator blends the spread
// between players with each player's own week-to-week volatility, the latter
// inflated by the league's kappa factor.

use crate::dataset::{CountingStat, Dataset, PercentageStat, PlayerRecord};
use crate::scoring::category::{CategoryKind, CategorySpec, PuntSet, CATEGORIES};
use crate::scoring::pool::{build_reference_pool, LeagueSettings};
use thiserror::Error;

/// Threshold below which a variance denominator is treated as zero.
const VARIANCE_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("player not found in dataset: {0}")]
    PlayerNotFound(String),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A single category score: a number, or the "not applicable" sentinel used
/// for punted and display-only slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Value(f64),
    NotApplicable,
}

impl Score {
    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Value(v) => Some(*v),
            Score::NotApplicable => None,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Value(v) => write!(f, "{v:.2}"),
            Score::NotApplicable => write!(f, "-"),
        }
    }
}

/// Which player a highlight points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    PlayerOne,
    PlayerTwo,
}

/// One row of the comparison table.
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub label: &'static str,
    /// Scores rounded for display; highlights are decided on the unrounded
    /// values before rounding.
    pub score1: Score,
    pub score2: Score,
    pub raw1: String,
    pub raw2: String,
    pub better: Option<Side>,
}

/// Full output of one comparison: 11 category rows plus the aggregate score
/// per player. Recomputed on every request, never persisted.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub player1: String,
    pub player2: String,
    pub rows: Vec<CategoryRow>,
    pub overall1: Score,
    pub overall2: Score,
    pub overall_better: Option<Side>,
}

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a slice of values.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator), since the pool
/// represents the full relevant player universe rather than a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to two decimals for display, mapping -0.0 to 0.0.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn better_side(g1: f64, g2: f64) -> Option<Side> {
    if g1 > g2 {
        Some(Side::PlayerOne)
    } else if g2 > g1 {
        Some(Side::PlayerTwo)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Per-category scoring
// ---------------------------------------------------------------------------

/// G scores for both targets in a counting category.
///
/// The denominator combines the spread of the pool's weekly averages with
/// the pool-average squared week-to-week volatility. The between-player term
/// enters unsquared (the raw std), unlike the percentage path; the formula
/// sheet is asymmetric on purpose.
pub fn counting_gscores(
    stat: CountingStat,
    lower_is_better: bool,
    p1: &PlayerRecord,
    p2: &PlayerRecord,
    pool: &[&PlayerRecord],
    kappa: f64,
) -> (f64, f64) {
    if pool.is_empty() {
        return (0.0, 0.0);
    }

    let ref_avgs: Vec<f64> = pool.iter().map(|p| mean(p.weekly(stat))).collect();
    let league = compute_pool_stats(&ref_avgs);

    let tau_sq = mean(
        &pool
            .iter()
            .map(|p| compute_pool_stats(p.weekly(stat)).stdev.powi(2))
            .collect::<Vec<f64>>(),
    );

    let denom_sq = league.stdev + kappa * tau_sq;
    if denom_sq < VARIANCE_EPSILON {
        return (0.0, 0.0);
    }
    let denom = denom_sq.sqrt();

    let sign = if lower_is_better { -1.0 } else { 1.0 };
    let score = |p: &PlayerRecord| sign * (mean(p.weekly(stat)) - league.mean) / denom;
    (score(p1), score(p2))
}

/// G scores for both targets in a percentage category.
///
/// Attempt-volume weighted: the deviation from the league composite rate is
/// scaled by the player's share of the pool's average weekly attempts, so a
/// low-volume extreme rate cannot dominate a high-volume solid one.
pub fn percentage_gscores(
    stat: PercentageStat,
    p1: &PlayerRecord,
    p2: &PlayerRecord,
    pool: &[&PlayerRecord],
    kappa: f64,
) -> (f64, f64) {
    if pool.is_empty() {
        return (0.0, 0.0);
    }

    let total_made: f64 = pool.iter().map(|p| p.season_made(stat)).sum();
    let total_att: f64 = pool.iter().map(|p| p.season_attempted(stat)).sum();
    let rate_all = if total_att > 0.0 {
        total_made / total_att
    } else {
        0.0
    };

    // Mean of per-player weekly-attempt means, not a flat mean over all
    // player-weeks.
    let avg_att = mean(
        &pool
            .iter()
            .map(|p| mean(p.weekly_attempted(stat)))
            .collect::<Vec<f64>>(),
    );
    if avg_att < VARIANCE_EPSILON {
        return (0.0, 0.0);
    }

    let sigma_sq = mean(
        &pool
            .iter()
            .map(|p| (p.season_rate(stat) - rate_all).powi(2))
            .collect::<Vec<f64>>(),
    );

    let tau_sq = mean(
        &pool
            .iter()
            .map(|p| {
                let made = p.weekly_made(stat);
                let attempts = p.weekly_attempted(stat);
                let weighted: Vec<f64> = made
                    .iter()
                    .zip(attempts.iter())
                    .map(|(&m, &a)| {
                        let rate = if a == 0.0 { 0.0 } else { m / a };
                        (a / avg_att) * (rate - rate_all)
                    })
                    .collect();
                compute_pool_stats(&weighted).stdev.powi(2)
            })
            .collect::<Vec<f64>>(),
    );

    let denom_sq = sigma_sq + kappa * tau_sq;
    if denom_sq < VARIANCE_EPSILON {
        return (0.0, 0.0);
    }
    let denom = denom_sq.sqrt();

    let score = |p: &PlayerRecord| {
        (mean(p.weekly_attempted(stat)) / avg_att) * (p.season_rate(stat) - rate_all) / denom
    };
    (score(p1), score(p2))
}

// ---------------------------------------------------------------------------
// Comparison assembly
// ---------------------------------------------------------------------------

fn unscored_row(spec: &CategorySpec, p1: &PlayerRecord, p2: &PlayerRecord) -> CategoryRow {
    CategoryRow {
        label: spec.label,
        score1: Score::NotApplicable,
        score2: Score::NotApplicable,
        raw1: spec.raw_stat(p1),
        raw2: spec.raw_stat(p2),
        better: None,
    }
}

/// Score every category slot for both players against the given reference
/// pool and assemble the comparison table.
///
/// Punted and display-only slots report [`Score::NotApplicable`] and do not
/// contribute to the aggregate. The aggregate is the mean of the unrounded
/// remaining scores, rounded last.
pub fn compute_comparison(
    p1: &PlayerRecord,
    p2: &PlayerRecord,
    pool: &[&PlayerRecord],
    punts: &PuntSet,
    kappa: f64,
) -> ComparisonResult {
    let mut rows = Vec::with_capacity(CATEGORIES.len());
    let mut numeric1 = Vec::new();
    let mut numeric2 = Vec::new();

    for spec in &CATEGORIES {
        if punts.contains(spec.label) {
            rows.push(unscored_row(spec, p1, p2));
            continue;
        }

        let scores = match spec.kind {
            CategoryKind::Counting {
                stat,
                lower_is_better,
            } => Some(counting_gscores(stat, lower_is_better, p1, p2, pool, kappa)),
            CategoryKind::Percentage(stat) => Some(percentage_gscores(stat, p1, p2, pool, kappa)),
            CategoryKind::DisplayOnly(_) => None,
        };

        match scores {
            Some((g1, g2)) => {
                numeric1.push(g1);
                numeric2.push(g2);
                rows.push(CategoryRow {
                    label: spec.label,
                    score1: Score::Value(round2(g1)),
                    score2: Score::Value(round2(g2)),
                    raw1: spec.raw_stat(p1),
                    raw2: spec.raw_stat(p2),
                    better: better_side(g1, g2),
                });
            }
            None => rows.push(unscored_row(spec, p1, p2)),
        }
    }

    let overall = |scores: &[f64]| {
        if scores.is_empty() {
            Score::NotApplicable
        } else {
            Score::Value(round2(mean(scores)))
        }
    };
    let overall_better = if numeric1.is_empty() {
        None
    } else {
        better_side(mean(&numeric1), mean(&numeric2))
    };

    ComparisonResult {
        player1: p1.name.clone(),
        player2: p2.name.clone(),
        rows,
        overall1: overall(&numeric1),
        overall2: overall(&numeric2),
        overall_better,
    }
}

/// Resolve both players by name, build the reference pool, and run one
/// comparison. Both names must resolve before any computation starts.
pub fn compare_players(
    dataset: &Dataset,
    name1: &str,
    name2: &str,
    league: &LeagueSettings,
    punts: &PuntSet,
) -> Result<ComparisonResult, CompareError> {
    let p1 = dataset
        .get(name1)
        .ok_or_else(|| CompareError::PlayerNotFound(name1.to_string()))?;
    let p2 = dataset
        .get(name2)
        .ok_or_else(|| CompareError::PlayerNotFound(name2.to_string()))?;
    let pool = build_reference_pool(dataset.players(), league);
    Ok(compute_comparison(p1, p2, &pool, punts, league.kappa()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::WeeklyLog;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    /// A consistent baseline player; tests override the fields they exercise.
    fn base(name: &str, weeks: usize) -> PlayerRecord {
        PlayerRecord {
            name: name.into(),
            composite_z: 5.0,
            fg_made: 10.0 * weeks as f64,
            fg_attempted: 20.0 * weeks as f64,
            fg_pct: 0.5,
            ft_made: 5.0 * weeks as f64,
            ft_attempted: 6.0 * weeks as f64,
            ft_pct: 5.0 / 6.0,
            avg_threes: 2.0,
            avg_points: 20.0,
            avg_rebounds: 8.0,
            avg_assists: 5.0,
            avg_steals: 1.0,
            avg_blocks: 0.5,
            avg_turnovers: 2.5,
            weekly: WeeklyLog {
                threes: vec![2.0; weeks],
                points: vec![20.0; weeks],
                rebounds: vec![8.0; weeks],
                assists: vec![5.0; weeks],
                steals: vec![1.0; weeks],
                blocks: vec![0.5; weeks],
                turnovers: vec![2.5; weeks],
                fg_made: vec![10.0; weeks],
                fg_attempted: vec![20.0; weeks],
                ft_made: vec![5.0; weeks],
                ft_attempted: vec![6.0; weeks],
            },
        }
    }

    fn points_player(name: &str, points: Vec<f64>) -> PlayerRecord {
        let mut p = base(name, points.len());
        p.avg_points = mean(&points);
        p.weekly.points = points;
        p
    }

    fn shooting_player(name: &str, made: Vec<f64>, attempted: Vec<f64>, pct: f64) -> PlayerRecord {
        let mut p = base(name, attempted.len());
        p.fg_made = made.iter().sum();
        p.fg_attempted = attempted.iter().sum();
        p.fg_pct = pct;
        p.weekly.fg_made = made;
        p.weekly.fg_attempted = attempted;
        p
    }

    // ---- compute_pool_stats / round2 ----

    #[test]
    fn pool_stats_known_values() {
        // Values: [2, 4, 4, 4, 5, 5, 7, 9]
        // Mean = 5.0, population variance = 4.0, stdev = 2.0
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = compute_pool_stats(&values);
        assert!(approx_eq(stats.mean, 5.0, 1e-10));
        assert!(approx_eq(stats.stdev, 2.0, 1e-10));
    }

    #[test]
    fn pool_stats_empty_and_single() {
        let stats = compute_pool_stats(&[]);
        assert!(approx_eq(stats.mean, 0.0, 1e-10));
        assert!(approx_eq(stats.stdev, 0.0, 1e-10));

        let stats = compute_pool_stats(&[42.0]);
        assert!(approx_eq(stats.mean, 42.0, 1e-10));
        assert!(approx_eq(stats.stdev, 0.0, 1e-10));
    }

    #[test]
    fn round2_normalizes_negative_zero() {
        let r = round2(-0.004);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive(), "-0.00 must normalize to 0.00");

        let r = round2(-0.0049);
        assert!(r.is_sign_positive());

        assert!(approx_eq(round2(-0.006), -0.01, 1e-12));
        assert!(approx_eq(round2(1.006), 1.01, 1e-12));
        assert!(approx_eq(round2(-1.237), -1.24, 1e-12));
    }

    #[test]
    fn score_display() {
        assert_eq!(Score::Value(1.5).to_string(), "1.50");
        assert_eq!(Score::Value(0.0).to_string(), "0.00");
        assert_eq!(Score::NotApplicable.to_string(), "-");
    }

    // ---- Counting path ----

    /// End-to-end counting scenario with hand-computed constants.
    ///
    /// Five reference players with weekly averages [20, 22, 24, 26, 28] and
    /// per-player weekly std 2 (alternating avg-2 / avg+2); one team of five
    /// roster spots, so kappa = 10/9.
    ///
    ///   mu        = 24
    ///   spread    = popstd([20,22,24,26,28]) = sqrt(8)
    ///   tau^2     = mean(2^2) = 4
    ///   g(30)     = (30 - 24) / sqrt(sqrt(8) + (10/9) * 4)
    #[test]
    fn counting_gscore_hand_computed() {
        let pool_players: Vec<PlayerRecord> = [20.0, 22.0, 24.0, 26.0, 28.0]
            .iter()
            .map(|&avg| {
                points_player(
                    &format!("Ref{avg}"),
                    vec![avg - 2.0, avg + 2.0, avg - 2.0, avg + 2.0],
                )
            })
            .collect();
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();
        let kappa = 10.0 / 9.0;

        let target = points_player("Target", vec![30.0; 4]);
        let average = points_player("Average", vec![24.0; 4]);

        let (g_target, g_average) =
            counting_gscores(CountingStat::Points, false, &target, &average, &pool, kappa);

        let expected = 6.0 / (8.0_f64.sqrt() + kappa * 4.0).sqrt();
        assert!(approx_eq(g_target, expected, 1e-12));
        assert!(approx_eq(g_target, 2.2248, 1e-4));
        assert!(approx_eq(g_average, 0.0, 1e-12));
    }

    #[test]
    fn turnovers_invert_sign() {
        let pool_players: Vec<PlayerRecord> = [2.0, 3.0, 4.0]
            .iter()
            .enumerate()
            .map(|(i, &avg)| {
                let mut p = base(&format!("Ref{i}"), 3);
                p.weekly.turnovers = vec![avg; 3];
                p
            })
            .collect();
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();

        let mut heavy = base("Heavy", 3);
        heavy.weekly.turnovers = vec![5.0; 3];
        let mut light = base("Light", 3);
        light.weekly.turnovers = vec![1.0; 3];

        let (g_heavy, g_light) =
            counting_gscores(CountingStat::Turnovers, true, &heavy, &light, &pool, 1.0);

        // More turnovers than the league average is bad, fewer is good.
        assert!(g_heavy < 0.0);
        assert!(g_light > 0.0);

        // The same above-average volume in a non-inverted category is good.
        let (g_plain, _) =
            counting_gscores(CountingStat::Turnovers, false, &heavy, &light, &pool, 1.0);
        assert!(approx_eq(g_plain, -g_heavy, 1e-12));
    }

    #[test]
    fn counting_zero_variance_falls_back_to_zero() {
        let pool_players: Vec<PlayerRecord> =
            (0..4).map(|i| points_player(&format!("Clone{i}"), vec![20.0; 3])).collect();
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();

        let target = points_player("Target", vec![35.0; 3]);
        let other = points_player("Other", vec![5.0; 3]);

        let (g1, g2) = counting_gscores(CountingStat::Points, false, &target, &other, &pool, 1.0);
        assert!(approx_eq(g1, 0.0, 1e-12));
        assert!(approx_eq(g2, 0.0, 1e-12));
    }

    #[test]
    fn counting_empty_pool_falls_back_to_zero() {
        let target = points_player("Target", vec![30.0; 3]);
        let (g1, g2) = counting_gscores(CountingStat::Points, false, &target, &target, &[], 1.0);
        assert!(approx_eq(g1, 0.0, 1e-12));
        assert!(approx_eq(g2, 0.0, 1e-12));
    }

    // ---- Percentage path ----

    /// Identical season rates with different weekly attempt volumes must
    /// produce different scores; the attempt-share multiplier is linear.
    #[test]
    fn percentage_scores_are_volume_weighted() {
        // Pool: constant weekly shooting, composite rate 0.45, avg_att 20.
        let pool_players = vec![
            shooting_player("RefA", vec![9.0; 3], vec![20.0; 3], 0.45),
            shooting_player("RefB", vec![10.0; 3], vec![20.0; 3], 0.5),
            shooting_player("RefC", vec![8.0; 3], vec![20.0; 3], 0.4),
        ];
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();

        let low_volume = shooting_player("Low", vec![5.0; 3], vec![10.0; 3], 0.5);
        let high_volume = shooting_player("High", vec![10.0; 3], vec![20.0; 3], 0.5);

        let (g_low, g_high) = percentage_gscores(
            PercentageStat::FieldGoals,
            &low_volume,
            &high_volume,
            &pool,
            1.0,
        );

        assert!(g_low > 0.0);
        assert!(g_high > 0.0);
        // Double the attempts, double the score.
        assert!(approx_eq(g_high, 2.0 * g_low, 1e-10));
    }

    #[test]
    fn percentage_hand_computed() {
        // rate_all = (27 + 30 + 24) / 180 = 0.45, avg_att = 20,
        // sigma^2 = (0 + 0.0025 + 0.0025) / 3, tau^2 = 0 (constant weeks).
        let pool_players = vec![
            shooting_player("RefA", vec![9.0; 3], vec![20.0; 3], 0.45),
            shooting_player("RefB", vec![10.0; 3], vec![20.0; 3], 0.5),
            shooting_player("RefC", vec![8.0; 3], vec![20.0; 3], 0.4),
        ];
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();

        let target = shooting_player("Target", vec![10.0; 3], vec![20.0; 3], 0.5);
        let (g, _) =
            percentage_gscores(PercentageStat::FieldGoals, &target, &target, &pool, 1.0);

        let sigma_sq: f64 = (0.0 + 0.0025 + 0.0025) / 3.0;
        let expected = 1.0 * (0.5 - 0.45) / sigma_sq.sqrt();
        assert!(approx_eq(g, expected, 1e-12));
    }

    #[test]
    fn percentage_zero_attempt_week_is_finite() {
        let pool_players = vec![
            shooting_player("Hurt", vec![0.0, 10.0, 10.0], vec![0.0, 20.0, 20.0], 0.5),
            shooting_player("RefB", vec![9.0; 3], vec![20.0; 3], 0.45),
        ];
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();

        let target = shooting_player("Target", vec![10.0; 3], vec![20.0; 3], 0.5);
        let (g1, g2) = percentage_gscores(PercentageStat::FieldGoals, &target, &target, &pool, 1.0);
        assert!(g1.is_finite());
        assert!(g2.is_finite());
    }

    #[test]
    fn percentage_degenerate_pool_falls_back_to_zero() {
        // No attempts anywhere: composite rate and mean attempts are 0.
        let pool_players = vec![
            shooting_player("Empty1", vec![0.0; 3], vec![0.0; 3], 0.0),
            shooting_player("Empty2", vec![0.0; 3], vec![0.0; 3], 0.0),
        ];
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();

        let target = shooting_player("Target", vec![10.0; 3], vec![20.0; 3], 0.5);
        let (g1, g2) = percentage_gscores(PercentageStat::FieldGoals, &target, &target, &pool, 1.0);
        assert!(approx_eq(g1, 0.0, 1e-12));
        assert!(approx_eq(g2, 0.0, 1e-12));
    }

    // ---- Comparison assembly ----

    fn varied_pool() -> Vec<PlayerRecord> {
        (0..5)
            .map(|i| {
                let f = i as f64;
                let mut p = base(&format!("Ref{i}"), 3);
                p.composite_z = 10.0 - f;
                p.weekly.points = vec![18.0 + 2.0 * f, 20.0 + 2.0 * f, 22.0 + 2.0 * f];
                p.weekly.rebounds = vec![6.0 + f; 3];
                p.weekly.assists = vec![3.0 + f; 3];
                p.weekly.steals = vec![0.5 + 0.25 * f; 3];
                p.weekly.blocks = vec![0.25 + 0.25 * f; 3];
                p.weekly.turnovers = vec![1.5 + 0.5 * f; 3];
                p.weekly.threes = vec![1.0 + 0.5 * f; 3];
                p.weekly.fg_made = vec![8.0 + f; 3];
                p.fg_made = 3.0 * (8.0 + f);
                p.fg_pct = (8.0 + f) / 20.0;
                p.weekly.ft_made = vec![3.0 + 0.5 * f; 3];
                p.ft_made = 3.0 * (3.0 + 0.5 * f);
                p.ft_pct = (3.0 + 0.5 * f) / 6.0;
                p
            })
            .collect()
    }

    #[test]
    fn identical_players_tie_everywhere() {
        let pool_players = varied_pool();
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();
        let p = pool_players[2].clone();

        let result = compute_comparison(&p, &p, &pool, &PuntSet::default(), 26.0 / 25.0);

        assert_eq!(result.rows.len(), 11);
        for row in &result.rows {
            assert_eq!(row.score1, row.score2, "category {}", row.label);
            assert_eq!(row.better, None, "category {}", row.label);
        }
        assert_eq!(result.overall1, result.overall2);
        assert_eq!(result.overall_better, None);
    }

    #[test]
    fn display_only_rows_never_scored() {
        let pool_players = varied_pool();
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();

        let result = compute_comparison(
            &pool_players[0],
            &pool_players[1],
            &pool,
            &PuntSet::default(),
            1.0,
        );

        for label in ["FGM/FGA", "FTM/FTA"] {
            let row = result.rows.iter().find(|r| r.label == label).unwrap();
            assert_eq!(row.score1, Score::NotApplicable);
            assert_eq!(row.score2, Score::NotApplicable);
            assert_eq!(row.better, None);
            assert!(row.raw1.contains('/'), "raw stat {}", row.raw1);
        }
    }

    #[test]
    fn punted_categories_excluded_from_aggregate() {
        let pool_players = varied_pool();
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();
        let p1 = &pool_players[0];
        let p2 = &pool_players[4];
        let kappa = 10.0 / 9.0;

        let punts = PuntSet::new(&["FG%", "FT%", "3PTM", "PTS"]).unwrap();
        let result = compute_comparison(p1, p2, &pool, &punts, kappa);

        // 4 punted + 2 display-only rows report no score; 5 remain numeric.
        let numeric: Vec<&CategoryRow> = result
            .rows
            .iter()
            .filter(|r| r.score1.value().is_some())
            .collect();
        assert_eq!(numeric.len(), 5);
        for row in &result.rows {
            if ["FG%", "FT%", "3PTM", "PTS"].contains(&row.label) {
                assert_eq!(row.score1, Score::NotApplicable);
                assert_eq!(row.better, None);
            }
        }

        // The aggregate is the mean of the unrounded surviving scores.
        let surviving = [
            counting_gscores(CountingStat::Rebounds, false, p1, p2, &pool, kappa),
            counting_gscores(CountingStat::Assists, false, p1, p2, &pool, kappa),
            counting_gscores(CountingStat::Steals, false, p1, p2, &pool, kappa),
            counting_gscores(CountingStat::Blocks, false, p1, p2, &pool, kappa),
            counting_gscores(CountingStat::Turnovers, true, p1, p2, &pool, kappa),
        ];
        let expected1: f64 = surviving.iter().map(|(g, _)| g).sum::<f64>() / 5.0;
        let expected2: f64 = surviving.iter().map(|(_, g)| g).sum::<f64>() / 5.0;
        assert_eq!(result.overall1, Score::Value(round2(expected1)));
        assert_eq!(result.overall2, Score::Value(round2(expected2)));
    }

    #[test]
    fn stronger_player_marked_better() {
        let pool_players = varied_pool();
        let pool: Vec<&PlayerRecord> = pool_players.iter().collect();

        let strong = points_player("Strong", vec![35.0; 3]);
        let weak = points_player("Weak", vec![10.0; 3]);

        let result =
            compute_comparison(&strong, &weak, &pool, &PuntSet::default(), 1.0);
        let pts = result.rows.iter().find(|r| r.label == "PTS").unwrap();
        assert_eq!(pts.better, Some(Side::PlayerOne));
        assert!(pts.score1.value().unwrap() > pts.score2.value().unwrap());
    }

    #[test]
    fn empty_pool_comparison_is_all_zeros() {
        let p1 = points_player("One", vec![30.0; 3]);
        let p2 = points_player("Two", vec![10.0; 3]);

        let result = compute_comparison(&p1, &p2, &[], &PuntSet::default(), 1.0);

        for row in &result.rows {
            match row.score1 {
                Score::Value(v) => {
                    assert!(approx_eq(v, 0.0, 1e-12), "category {}", row.label)
                }
                Score::NotApplicable => {}
            }
            assert_eq!(row.better, None, "category {}", row.label);
        }
        assert_eq!(result.overall1, Score::Value(0.0));
        assert_eq!(result.overall2, Score::Value(0.0));
        assert_eq!(result.overall_better, None);
    }
}
