//! Repeated trials of one searcher against a random opponent, and the bookkeeping around them.
//!
//! The searcher under test always plays X. With [`Starter::O`] every game opens with a random
//! O mark. Everything random in an experiment is derived from its single seed.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use enum_iterator::{all, Sequence};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{GameEndStatus, GameError, Player};
use crate::game::{new_game, o_opening, run_trial, TrialOutcome};
use crate::player::{ttt_heuristic, ABAi, MinMaxAi, RandomAi, RolloutAi};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Sequence, Serialize, Deserialize,
)]
pub enum Algorithm {
    /// Exhaustive minimax, param is the depth
    Minimax,
    /// Alpha-beta minimax, param is the depth
    AlphaBeta,
    /// Flat Monte Carlo, param is the playouts per move
    Rollout,
}

impl Algorithm {
    /// The parameters the experiment grid runs when none are given.
    pub fn default_params(&self) -> &'static [usize] {
        match self {
            Algorithm::Minimax | Algorithm::AlphaBeta => &[4, 6],
            Algorithm::Rollout => &[100, 500],
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Minimax => write!(f, "Minimax"),
            Algorithm::AlphaBeta => write!(f, "Alpha-beta"),
            Algorithm::Rollout => write!(f, "Rollout"),
        }
    }
}

/// Who places the first mark.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Sequence, Serialize, Deserialize,
)]
pub enum Starter {
    X,
    O,
}

impl std::fmt::Display for Starter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Starter::X => write!(f, "X"),
            Starter::O => write!(f, "O"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("rollout needs at least one simulation per move")]
    ZeroSimulations,

    #[error(transparent)]
    Game(#[from] GameError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub algorithm: Algorithm,
    /// search depth, or playouts per move
    pub param: usize,
    pub starter: Starter,
    pub games: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentResult {
    pub config: ExperimentConfig,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Search cost per game: playouts for rollout, visited nodes for the minimax variants
    pub avg_nodes: f64,
    pub elapsed: Duration,
}

/// The X player for an experiment.
pub fn make_searcher(
    algorithm: Algorithm,
    param: usize,
    seed: u64,
) -> Result<Box<dyn Player>, ExperimentError> {
    Ok(match algorithm {
        Algorithm::Minimax => Box::new(MinMaxAi::new(ttt_heuristic, param, seed)),
        Algorithm::AlphaBeta => Box::new(ABAi::new(ttt_heuristic, param, seed)),
        Algorithm::Rollout => {
            let simulations = NonZeroUsize::new(param).ok_or(ExperimentError::ZeroSimulations)?;
            Box::new(RolloutAi::new(seed, simulations))
        }
    })
}

/// Every (algorithm, param) pair crossed with every starter. `params` overrides the defaults.
/// Each experiment gets its own seed, counted up from `seed`.
pub fn grid(
    algorithms: &[Algorithm],
    params: &[usize],
    starters: &[Starter],
    games: usize,
    seed: u64,
) -> Vec<ExperimentConfig> {
    let mut configs = vec![];
    for &algorithm in algorithms {
        let params = if params.is_empty() {
            algorithm.default_params()
        } else {
            params
        };
        for &param in params {
            for &starter in starters {
                configs.push(ExperimentConfig {
                    algorithm,
                    param,
                    starter,
                    games,
                    seed: seed.wrapping_add(configs.len() as u64),
                });
            }
        }
    }
    configs
}

/// Minimax 4 and 6, alpha-beta 4 and 6, rollout 100 and 500, each with X and with O starting.
pub fn default_grid(games: usize, seed: u64) -> Vec<ExperimentConfig> {
    grid(
        &all::<Algorithm>().collect::<Vec<_>>(),
        &[],
        &all::<Starter>().collect::<Vec<_>>(),
        games,
        seed,
    )
}

pub fn run_experiment(config: ExperimentConfig) -> Result<ExperimentResult, ExperimentError> {
    run_experiment_with(config, |_| {})
}

/// Like [`run_experiment`], calling `on_game` after every finished game.
pub fn run_experiment_with(
    config: ExperimentConfig,
    mut on_game: impl FnMut(&TrialOutcome),
) -> Result<ExperimentResult, ExperimentError> {
    info!(
        "Running {}({}) with {} starting, {} games, seed {}",
        config.algorithm, config.param, config.starter, config.games, config.seed
    );
    let t0 = Instant::now();
    let mut master = StdRng::seed_from_u64(config.seed);
    let mut searcher = make_searcher(config.algorithm, config.param, master.gen())?;
    let mut opponent = RandomAi::new(master.gen());
    let mut openings = StdRng::seed_from_u64(master.gen());

    let (mut wins, mut draws, mut losses) = (0, 0, 0);
    let mut total_cost = 0u64;
    for _ in 0..config.games {
        let board = match config.starter {
            Starter::X => new_game(),
            Starter::O => o_opening(&mut openings)?,
        };
        let outcome = run_trial(board, searcher.as_mut(), &mut opponent)?;
        total_cost += outcome.search_cost;
        on_game(&outcome);
        match outcome.status {
            GameEndStatus::X => wins += 1,
            GameEndStatus::Draw => draws += 1,
            GameEndStatus::O => losses += 1,
        }
    }

    let avg_nodes = if config.games == 0 {
        0.0
    } else {
        total_cost as f64 / config.games as f64
    };
    let elapsed = t0.elapsed();
    info!(
        "{}({}) finished: {} wins, {} draws, {} losses in {:.2?}",
        config.algorithm, config.param, wins, draws, losses, elapsed
    );
    Ok(ExperimentResult {
        config,
        wins,
        draws,
        losses,
        avg_nodes,
        elapsed,
    })
}

pub const TABLE_HEADER: &str =
    "| Algorithm  | Param | Starter |  Wins | Draws | Losses |   Nodes avg | Time (s) |";

pub fn table_separator() -> String {
    let widths = [12, 7, 9, 7, 7, 8, 13, 10];
    let dashes: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    format!("|{}|", dashes.join("|"))
}

pub fn table_row(r: &ExperimentResult) -> String {
    format!(
        "| {:<10} | {:^5} | {:^7} | {:>5} | {:>5} | {:>6} | {:>11.2} | {:>8.2} |",
        r.config.algorithm.to_string(),
        r.config.param,
        r.config.starter.to_string(),
        r.wins,
        r.draws,
        r.losses,
        r.avg_nodes,
        r.elapsed.as_secs_f64()
    )
}

/// One CSV row per finished experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub algorithm: Algorithm,
    pub param: usize,
    pub starter: Starter,
    pub games: usize,
    pub seed: u64,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub avg_nodes: f64,
    pub elapsed_secs: f64,
    pub played_at: chrono::DateTime<chrono::Local>,
}

impl ExperimentRecord {
    pub fn new(r: &ExperimentResult, played_at: chrono::DateTime<chrono::Local>) -> Self {
        ExperimentRecord {
            algorithm: r.config.algorithm,
            param: r.config.param,
            starter: r.config.starter,
            games: r.config.games,
            seed: r.config.seed,
            wins: r.wins,
            draws: r.draws,
            losses: r.losses,
            avg_nodes: r.avg_nodes,
            elapsed_secs: r.elapsed.as_secs_f64(),
            played_at,
        }
    }
}

/// Totals over every recorded run of one (algorithm, param, starter).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub algorithm: Algorithm,
    pub param: usize,
    pub starter: Starter,
    pub runs: usize,
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub avg_nodes: f64,
    pub elapsed_secs: f64,
}

impl Summary {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games as f64
    }
}

pub fn summarize<'a>(records: impl IntoIterator<Item = &'a ExperimentRecord>) -> Vec<Summary> {
    let mut by_key: BTreeMap<(Algorithm, usize, Starter), Summary> = BTreeMap::new();
    for r in records {
        let s = by_key
            .entry((r.algorithm, r.param, r.starter))
            .or_insert_with(|| Summary {
                algorithm: r.algorithm,
                param: r.param,
                starter: r.starter,
                runs: 0,
                games: 0,
                wins: 0,
                draws: 0,
                losses: 0,
                avg_nodes: 0.0,
                elapsed_secs: 0.0,
            });
        // game-weighted running mean
        let games = s.games + r.games;
        if games > 0 {
            s.avg_nodes =
                (s.avg_nodes * s.games as f64 + r.avg_nodes * r.games as f64) / games as f64;
        }
        s.runs += 1;
        s.games = games;
        s.wins += r.wins;
        s.draws += r.draws;
        s.losses += r.losses;
        s.elapsed_secs += r.elapsed_secs;
    }
    by_key.into_values().collect()
}
