//! Output formatting utilities for CLI.

// Text reports divide counts
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use spirit_arena::{BatchStats, Element, MatchResult};
use std::fmt::Write;

/// Format a single match result as human-readable text.
pub(super) fn format_text(result: &MatchResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "=== MATCH RESULT ===");
    let _ = writeln!(output);
    match result.winner {
        Some(winner) => {
            let element = result
                .teams
                .iter()
                .find(|t| t.id == winner)
                .map_or("unknown", |t| t.element.name());
            let _ = writeln!(output, "Winner: Team {winner} ({element})");
        }
        None => {
            let _ = writeln!(output, "Result: Draw");
        }
    }
    let _ = writeln!(
        output,
        "Duration: {:.1}s ({} ticks)",
        result.duration_ms / 1000.0,
        result.ticks
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "Final scores:");
    for team in &result.teams {
        let _ = writeln!(
            output,
            "  Team {} ({}): {} points, {} deposited",
            team.id,
            team.element.name(),
            team.score,
            team.deposited
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Spirits: {} spawned, {} destroyed",
        result.spirits_spawned, result.spirits_destroyed
    );

    output
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Total matches played.
    matches_played: u64,
    /// Per-team statistics.
    teams: Vec<JsonBatchTeam>,
    /// Number of draws.
    draws: u64,
    /// Average match length in ticks.
    avg_ticks: f64,
}

/// JSON-serializable per-team batch stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchTeam {
    /// Team index.
    team: usize,
    /// Team element.
    element: Option<Element>,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average score.
    avg_score: f64,
    /// Score standard deviation.
    score_std_dev: f64,
    /// Average spirits deposited.
    avg_deposits: f64,
}

impl JsonBatchResult {
    /// Create from aggregated stats.
    pub(super) fn from_stats(stats: &BatchStats) -> Self {
        let teams = (0..stats.team_count())
            .map(|i| JsonBatchTeam {
                team: i,
                element: stats.elements.get(i).copied(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_score: stats.avg_score(i),
                score_std_dev: stats.score_std_dev(i),
                avg_deposits: stats.avg_deposits(i),
            })
            .collect();

        Self {
            matches_played: stats.matches_played,
            teams,
            draws: stats.draws,
            avg_ticks: stats.avg_ticks(),
        }
    }
}

fn element_name(stats: &BatchStats, team: usize) -> &'static str {
    stats.elements.get(team).map_or("unknown", |e| e.name())
}

/// Format batch stats as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Batch Results ({} matches)", stats.matches_played);
    let _ = writeln!(output, "========================================");
    let _ = writeln!(output);

    let _ = writeln!(output, "Win Rates:");
    for i in 0..stats.team_count() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let _ = writeln!(
            output,
            "  Team {i} ({}): {:.1}% ({wins} wins)",
            element_name(stats, i),
            stats.win_rate(i) * 100.0
        );
    }
    let _ = writeln!(
        output,
        "  Draws: {} ({:.1}%)",
        stats.draws,
        stats.draw_rate() * 100.0
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "Average Scores:");
    for i in 0..stats.team_count() {
        let _ = writeln!(
            output,
            "  Team {i} ({}): {:.1} (+/- {:.1}), {:.1} deposited",
            element_name(stats, i),
            stats.avg_score(i),
            stats.score_std_dev(i),
            stats.avg_deposits(i)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Average Match Length: {:.0} ticks", stats.avg_ticks());

    output
}

/// Format batch stats as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats) -> String {
    let mut output = String::new();

    // Header
    output.push_str("team,element,wins,win_rate,avg_score,score_std_dev,avg_deposits\n");

    for i in 0..stats.team_count() {
        let _ = writeln!(
            output,
            "{i},{},{},{:.4},{:.2},{:.2},{:.2}",
            element_name(stats, i),
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_score(i),
            stats.score_std_dev(i),
            stats.avg_deposits(i)
        );
    }

    output
}
