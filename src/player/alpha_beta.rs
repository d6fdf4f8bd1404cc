use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use super::random_move;
use crate::core::{GameError, Player};
use crate::game::tictactoe::{TTTAddr, TTTBoard};
use crate::search::{search, HeuristicFn, SearchResult, SearchStats, Window};

/// Minimax with alpha-beta pruning down to `max_depth` plies.
/// Picks the same moves as [`super::MinMaxAi`] at the same depth, visiting fewer nodes.
pub struct ABAi {
    /// A performance counter. If we prune well, this number is small
    stats: SearchStats,
    heuristic_fn: HeuristicFn,
    max_depth: usize,
    /// Only used when the search has no move to offer
    rng: StdRng,
}

impl ABAi {
    pub fn new(heuristic_fn: HeuristicFn, depth: usize, seed: u64) -> Self {
        Self {
            stats: SearchStats::default(),
            heuristic_fn,
            max_depth: depth,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The raw search result for the player to move, before any fallback.
    pub fn evaluate(&mut self, b: &TTTBoard) -> SearchResult {
        search(
            b,
            self.max_depth,
            Some(Window::full()),
            self.heuristic_fn,
            &mut self.stats,
        )
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

impl Player for ABAi {
    fn play(&mut self, b: &TTTBoard) -> Result<TTTAddr, GameError> {
        if b.is_terminal() {
            return Err(GameError::GameOver);
        }
        let res = self.evaluate(b);
        debug!(
            "alphabeta({}) plays {:?} with value {}",
            self.max_depth, res.best, res.value
        );
        match res.best {
            Some(a) => Ok(a),
            None => random_move(b, &mut self.rng),
        }
    }

    fn search_cost(&self) -> u64 {
        self.stats.nodes_visited
    }
}

impl Drop for ABAi {
    fn drop(&mut self) {
        debug!(
            "ABAi evaluated {} leaf nodes out of {} visited",
            self.stats.leaves_evaluated, self.stats.nodes_visited
        );
    }
}
