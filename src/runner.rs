//! Headless match runner.
//!
//! Provides a pure function interface: `(seed, config) -> MatchResult`.
//! Batches of matches are independent and run in parallel with rayon; each
//! match stays single-threaded and fully determined by its seed.

// Aggregate statistics divide counts
#![allow(clippy::cast_precision_loss)]

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::ArenaConfig;
use crate::error::MatchError;
use crate::game::{
    Element, MatchContext, Simulation, TeamId, TracingNotifier, assert_invariants,
};

/// Default simulation step: one 60 Hz frame.
pub const DEFAULT_TICK_MS: f64 = 1000.0 / 60.0;

/// Final standing of one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamResult {
    /// Team id.
    pub id: TeamId,
    /// Team element.
    pub element: Element,
    /// Final score.
    pub score: u32,
    /// Spirits that landed at the team's base.
    pub deposited: u32,
}

/// Result of a single match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Seed the match ran with.
    pub seed: u64,
    /// Winning team, `None` on a tie for the top score.
    pub winner: Option<TeamId>,
    /// Per-team standings, by team id.
    pub teams: Vec<TeamResult>,
    /// Updates run.
    pub ticks: u64,
    /// Simulated match length in milliseconds.
    pub duration_ms: f64,
    /// Spirits spawned over the match, respawns included.
    pub spirits_spawned: u32,
    /// Spirits destroyed without scoring.
    pub spirits_destroyed: u32,
}

/// Run a full match to the end of its round.
///
/// # Errors
///
/// Returns an error if the config is invalid, the tick is not positive, or
/// the world can't be built.
pub fn run_match(seed: u64, config: &ArenaConfig, tick_ms: f64) -> Result<MatchResult, MatchError> {
    if !(tick_ms > 0.0 && tick_ms.is_finite()) {
        return Err(MatchError::InvalidTick(tick_ms));
    }
    config.validate()?;

    let mut sim = Simulation::new(MatchContext::new(config.clone(), seed), TracingNotifier)?;
    let mut time = 0.0;
    while !sim.is_round_over() {
        time += tick_ms;
        sim.update(time, tick_ms);
        assert_invariants(sim.world());
    }

    let world = sim.world();
    let result = MatchResult {
        seed,
        winner: sim.winner(),
        teams: world
            .teams()
            .map(|t| TeamResult {
                id: t.id,
                element: t.element,
                score: t.score,
                deposited: t.deposited,
            })
            .collect(),
        ticks: sim.ticks(),
        duration_ms: time,
        spirits_spawned: world.ledger().spawned,
        spirits_destroyed: world.ledger().destroyed,
    };
    info!(seed, winner = ?result.winner, ticks = result.ticks, "match finished");
    Ok(result)
}

/// Aggregated statistics over many matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    /// Matches played.
    pub matches_played: u64,
    /// Win count per team index.
    pub wins: Vec<u64>,
    /// Matches without a single winner.
    pub draws: u64,
    /// Element of each team index, from the first recorded match.
    pub elements: Vec<Element>,
    total_scores: Vec<f64>,
    score_sq_sums: Vec<f64>,
    total_deposits: Vec<f64>,
    total_ticks: u64,
}

impl BatchStats {
    /// Create empty stats for `teams` teams.
    #[must_use]
    pub fn new(teams: usize) -> Self {
        Self {
            matches_played: 0,
            wins: vec![0; teams],
            draws: 0,
            elements: Vec::new(),
            total_scores: vec![0.0; teams],
            score_sq_sums: vec![0.0; teams],
            total_deposits: vec![0.0; teams],
            total_ticks: 0,
        }
    }

    /// Fold one match result in.
    pub fn add_result(&mut self, result: &MatchResult) {
        self.matches_played += 1;
        self.total_ticks += result.ticks;
        if self.elements.is_empty() {
            self.elements = result.teams.iter().map(|t| t.element).collect();
        }

        match result.winner {
            Some(winner) => {
                if let Some(wins) = self.wins.get_mut(usize::from(winner)) {
                    *wins += 1;
                }
            }
            None => self.draws += 1,
        }

        for team in &result.teams {
            let idx = usize::from(team.id);
            if idx < self.total_scores.len() {
                let score = f64::from(team.score);
                self.total_scores[idx] += score;
                self.score_sq_sums[idx] += score * score;
                self.total_deposits[idx] += f64::from(team.deposited);
            }
        }
    }

    /// Combine two partial aggregates.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.matches_played += other.matches_played;
        self.draws += other.draws;
        self.total_ticks += other.total_ticks;
        if self.elements.is_empty() {
            self.elements = other.elements;
        }
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_scores.iter_mut().zip(&other.total_scores) {
            *a += b;
        }
        for (a, b) in self.score_sq_sums.iter_mut().zip(&other.score_sq_sums) {
            *a += b;
        }
        for (a, b) in self.total_deposits.iter_mut().zip(&other.total_deposits) {
            *a += b;
        }
        self
    }

    /// Number of teams tracked.
    #[must_use]
    pub fn team_count(&self) -> usize {
        self.wins.len()
    }

    /// Win rate for a team (0.0-1.0).
    #[must_use]
    pub fn win_rate(&self, team: usize) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        self.wins.get(team).copied().unwrap_or(0) as f64 / self.matches_played as f64
    }

    /// Draw rate (0.0-1.0).
    #[must_use]
    pub fn draw_rate(&self) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        self.draws as f64 / self.matches_played as f64
    }

    /// Mean final score for a team.
    #[must_use]
    pub fn avg_score(&self, team: usize) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        self.total_scores.get(team).copied().unwrap_or(0.0) / self.matches_played as f64
    }

    /// Final score standard deviation for a team.
    #[must_use]
    pub fn score_std_dev(&self, team: usize) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        let n = self.matches_played as f64;
        let mean = self.avg_score(team);
        let sq_sum = self.score_sq_sums.get(team).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Mean spirits deposited per match for a team.
    #[must_use]
    pub fn avg_deposits(&self, team: usize) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        self.total_deposits.get(team).copied().unwrap_or(0.0) / self.matches_played as f64
    }

    /// Mean updates per match.
    #[must_use]
    pub fn avg_ticks(&self) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        self.total_ticks as f64 / self.matches_played as f64
    }
}

/// Run `matches` matches with seeds `base_seed, base_seed + 1, ...` in
/// parallel and aggregate them. `on_done` is called once per finished match.
///
/// # Errors
///
/// Returns the first error any match reported.
pub fn run_batch<F>(
    matches: u64,
    base_seed: u64,
    config: &ArenaConfig,
    tick_ms: f64,
    on_done: F,
) -> Result<BatchStats, MatchError>
where
    F: Fn() + Sync,
{
    config.validate()?;
    let teams = config.round.team_elements.len();

    (0..matches)
        .into_par_iter()
        .map(|i| {
            let result = run_match(base_seed.wrapping_add(i), config, tick_ms);
            on_done();
            result
        })
        .try_fold(
            || BatchStats::new(teams),
            |mut stats, result| {
                stats.add_result(&result?);
                Ok::<_, MatchError>(stats)
            },
        )
        .try_reduce(|| BatchStats::new(teams), |a, b| Ok(a.merge(b)))
}
