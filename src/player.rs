pub mod alpha_beta;
pub mod console;
pub mod heuristics;
pub mod min_max;
pub mod random;
pub mod rollout;

use rand::{seq::SliceRandom, Rng};

pub use alpha_beta::ABAi;
pub use heuristics::ttt_heuristic;
pub use min_max::MinMaxAi;
pub use random::RandomAi;
pub use rollout::RolloutAi;

use crate::core::GameError;
use crate::game::tictactoe::{TTTAddr, TTTBoard};

/// A uniformly random empty square. Also the fallback when a search has no move to offer.
pub fn random_move<R: Rng + ?Sized>(b: &TTTBoard, rng: &mut R) -> Result<TTTAddr, GameError> {
    b.valid_moves()
        .choose(rng)
        .copied()
        .ok_or(GameError::NoLegalMoves)
}
