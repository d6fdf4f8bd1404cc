//! Flat Monte Carlo move selection.
//!
//! Every legal move is scored by the average result of a number of uniformly random playouts
//! that start right after it. There is no tree: no selection, expansion or backpropagation past
//! the first ply, and the statistics are thrown away after each decision.
//!
//! Each candidate move gets its own RNG, seeded from the caller's RNG in ascending move order.
//! That keeps a seeded decision reproducible, and lets the `parallel` feature spread the
//! candidates over threads without changing the answer.

use std::num::NonZeroUsize;

use log::{debug, trace};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{GameError, Player};
use crate::game::tictactoe::{TTTAddr, TTTBoard};

/// Play counts and summed results (X-positive) for one candidate move.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RolloutStats {
    pub plays: u64,
    pub total: i64,
}

impl RolloutStats {
    pub fn record(&mut self, outcome: i32) {
        self.plays += 1;
        self.total += outcome as i64;
    }

    /// Average result. Zero when nothing was played.
    pub fn mean(&self) -> f64 {
        if self.plays == 0 {
            return 0.0;
        }
        self.total as f64 / self.plays as f64
    }
}

/// Play uniformly random moves for both sides until the game ends. Returns the utility.
pub fn rollout<R: Rng + ?Sized>(mut board: TTTBoard, rng: &mut R) -> Result<i32, GameError> {
    while !board.is_terminal() {
        let a = *board
            .valid_moves()
            .choose(rng)
            .ok_or(GameError::NoLegalMoves)?;
        board.make_move(a)?;
    }
    board.utility()
}

fn evaluate_move(
    board: &TTTBoard,
    a: TTTAddr,
    simulations: NonZeroUsize,
    seed: u64,
) -> Result<(TTTAddr, RolloutStats), GameError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut start = *board;
    start.make_move(a)?;
    let mut stats = RolloutStats::default();
    for _ in 0..simulations.get() {
        stats.record(rollout(start, &mut rng)?);
    }
    Ok((a, stats))
}

/// Rollout statistics for every legal move, in ascending move order.
pub fn evaluate_moves<R: Rng + ?Sized>(
    board: &TTTBoard,
    simulations: NonZeroUsize,
    rng: &mut R,
) -> Result<Vec<(TTTAddr, RolloutStats)>, GameError> {
    if board.is_terminal() {
        return Err(GameError::GameOver);
    }
    let moves = board.valid_moves();
    let seeds: Vec<u64> = moves.iter().map(|_| rng.gen()).collect();

    #[cfg(feature = "parallel")]
    let evaluated = moves
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(&a, &seed)| evaluate_move(board, a, simulations, seed))
        .collect::<Result<Vec<_>, _>>();
    #[cfg(not(feature = "parallel"))]
    let evaluated = moves
        .iter()
        .zip(seeds.iter())
        .map(|(&a, &seed)| evaluate_move(board, a, simulations, seed))
        .collect::<Result<Vec<_>, _>>();

    evaluated
}

/// Pick the move with the best average playout for the player to move.
///
/// Averages are X-positive, so O picks the lowest. Ties go to the lowest square.
pub fn best_move<R: Rng + ?Sized>(
    board: &TTTBoard,
    simulations: NonZeroUsize,
    rng: &mut R,
) -> Result<TTTAddr, GameError> {
    let sign = board.current_player().sign() as f64;
    let mut best: Option<(TTTAddr, f64)> = None;
    for (a, stats) in evaluate_moves(board, simulations, rng)? {
        let score = sign * stats.mean();
        trace!(
            "candidate {}: {} playouts, total {}, score {:.3}",
            a,
            stats.plays,
            stats.total,
            score
        );
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((a, score));
        }
    }
    best.map(|(a, _)| a).ok_or(GameError::NoLegalMoves)
}

/// A player that runs `simulations` random playouts per legal move.
pub struct RolloutAi {
    rng: StdRng,
    simulations: NonZeroUsize,
    /// simulations times number of candidates, summed over all decisions
    playouts: u64,
}

impl RolloutAi {
    /// seed is for the RNG
    pub fn new(seed: u64, simulations: NonZeroUsize) -> Self {
        RolloutAi {
            rng: StdRng::seed_from_u64(seed),
            simulations,
            playouts: 0,
        }
    }
}

impl Player for RolloutAi {
    fn play(&mut self, b: &TTTBoard) -> Result<TTTAddr, GameError> {
        let a = best_move(b, self.simulations, &mut self.rng)?;
        self.playouts += (self.simulations.get() * b.valid_moves().len()) as u64;
        debug!(
            "rollout({}) plays {} as {}",
            self.simulations,
            a,
            b.current_player()
        );
        Ok(a)
    }

    fn search_cost(&self) -> u64 {
        self.playouts
    }
}

impl Drop for RolloutAi {
    fn drop(&mut self) {
        debug!("RolloutAi ran {} playouts", self.playouts);
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    fn sims(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn rollout_ends_the_game() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let u = rollout(TTTBoard::new(), &mut rng).unwrap();
            assert!((-1..=1).contains(&u));
        }
    }

    #[test]
    fn rollout_of_a_finished_game_is_its_utility() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = TTTBoard::from_str("xo xo  ox").unwrap();
        assert_eq!(rollout(b, &mut rng), Ok(-1));
    }

    #[test]
    fn every_move_gets_every_simulation() {
        let b = TTTBoard::from_str("xo  x   o").unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let evaluated = evaluate_moves(&b, sims(30), &mut rng).unwrap();
        let moves: Vec<_> = evaluated.iter().map(|(a, _)| *a).collect();
        assert_eq!(moves, b.valid_moves());
        for (_, stats) in evaluated {
            assert_eq!(stats.plays, 30);
            assert!(stats.total.abs() <= 30);
        }
    }

    #[test]
    fn immediate_win_averages_one() {
        let b = TTTBoard::from_str("xx oo    ").unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let evaluated = evaluate_moves(&b, sims(10), &mut rng).unwrap();
        assert_eq!(evaluated[0].0, TTTAddr(2));
        assert_eq!(evaluated[0].1.mean(), 1.0);
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(best_move(&b, sims(10), &mut rng), Ok(TTTAddr(2)));
    }

    #[test]
    fn o_minimizes() {
        // O to move; square 5 wins for O
        let b = TTTBoard::from_str("xx oo   x").unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(best_move(&b, sims(200), &mut rng), Ok(TTTAddr(5)));
    }

    #[test]
    fn same_seed_same_decision() {
        let b = TTTBoard::new();
        let a1 = best_move(&b, sims(1000), &mut StdRng::seed_from_u64(77)).unwrap();
        let a2 = best_move(&b, sims(1000), &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a1, a2);
    }

    #[test]
    fn opens_in_the_centre_or_a_corner() {
        let mut rng = StdRng::seed_from_u64(12345);
        let a = best_move(&TTTBoard::new(), sims(1000), &mut rng).unwrap();
        assert!([0, 2, 4, 6, 8].contains(&a.0), "opened on edge {a}");
    }

    #[test]
    fn refuses_a_finished_game() {
        let b = TTTBoard::from_str("xxxoo    ").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(best_move(&b, sims(5), &mut rng), Err(GameError::GameOver));
    }

    #[test]
    fn counts_playouts_as_search_cost() {
        let mut ai = RolloutAi::new(3, sims(10));
        ai.play(&TTTBoard::new()).unwrap();
        assert_eq!(ai.search_cost(), 90);
    }
}
