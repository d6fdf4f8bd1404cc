use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use super::random_move;
use crate::core::{GameError, Player};
use crate::game::tictactoe::{TTTAddr, TTTBoard};

/// Plays a uniformly random empty square. The opponent in all experiments.
pub struct RandomAi<R> {
    rng: R,
}

impl<R: rand::Rng> Player for RandomAi<R> {
    fn play(&mut self, b: &TTTBoard) -> Result<TTTAddr, GameError> {
        if b.is_terminal() {
            return Err(GameError::GameOver);
        }
        let a = random_move(b, &mut self.rng)?;
        debug!("Random AI plays {} as {}", a, b.current_player());
        Ok(a)
    }
}

impl RandomAi<StdRng> {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}
