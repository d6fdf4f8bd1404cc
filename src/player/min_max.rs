use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use super::random_move;
use crate::core::{GameError, Player};
use crate::game::tictactoe::{TTTAddr, TTTBoard};
use crate::search::{search, HeuristicFn, SearchResult, SearchStats};

/// Exhaustive minimax down to `max_depth` plies, no pruning.
pub struct MinMaxAi {
    /// A performance counter. Compare with the alpha-beta player to see what pruning saves
    stats: SearchStats,
    heuristic_fn: HeuristicFn,
    max_depth: usize,
    /// Only used when the search has no move to offer
    rng: StdRng,
}

impl MinMaxAi {
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
        search(b, self.max_depth, None, self.heuristic_fn, &mut self.stats)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

impl Player for MinMaxAi {
    fn play(&mut self, b: &TTTBoard) -> Result<TTTAddr, GameError> {
        if b.is_terminal() {
            return Err(GameError::GameOver);
        }
        let res = self.evaluate(b);
        debug!(
            "minimax({}) plays {:?} with value {}",
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

impl Drop for MinMaxAi {
    fn drop(&mut self) {
        debug!(
            "MinMaxAi visited {} nodes, evaluated {} leaves",
            self.stats.nodes_visited, self.stats.leaves_evaluated
        );
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;
    use crate::player::ttt_heuristic;

    #[test]
    fn can_find_winning_move() {
        let b = TTTBoard::from_str("xx oo    ").unwrap();
        let mut ai = MinMaxAi::new(ttt_heuristic, 1, 0);
        let res = ai.evaluate(&b);
        assert_eq!(res.best, Some(TTTAddr(2)));
        assert_eq!(res.value, 1.0);
    }

    #[test]
    fn can_block_winning_move() {
        let b = TTTBoard::from_str("oo  x   x").unwrap();
        let mut ai = MinMaxAi::new(ttt_heuristic, 9, 0);
        assert_eq!(ai.play(&b), Ok(TTTAddr(2)));
    }

    #[test]
    fn depth_zero_falls_back_to_a_legal_move() {
        let b = TTTBoard::from_str("xo  x   o").unwrap();
        let mut ai = MinMaxAi::new(ttt_heuristic, 0, 5);
        for _ in 0..20 {
            let a = ai.play(&b).unwrap();
            assert!(b.valid_moves().contains(&a));
        }
    }

    #[test]
    fn refuses_a_finished_game() {
        let b = TTTBoard::from_str("xo xo  ox").unwrap();
        let mut ai = MinMaxAi::new(ttt_heuristic, 9, 0);
        assert_eq!(ai.play(&b), Err(GameError::GameOver));
    }

    #[test]
    fn counts_its_nodes() {
        let b = TTTBoard::from_str("xoxoxo   ").unwrap();
        let mut ai = MinMaxAi::new(ttt_heuristic, 9, 0);
        ai.play(&b).unwrap();
        assert!(ai.search_cost() > 1);
        assert_eq!(ai.search_cost(), ai.stats().nodes_visited);
    }
}
