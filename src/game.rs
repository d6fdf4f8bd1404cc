use log::debug;
use rand::Rng;

use crate::core::{GameEndStatus, GameError, Player, PlayerMark};
use crate::player::random_move;

use self::tictactoe::{TTTAddr, TTTBoard};

pub mod tictactoe;

/// How one game went, seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    pub status: GameEndStatus,
    /// Search cost the X player spent during this game
    pub search_cost: u64,
    pub n_moves: usize,
}

/// The fixed starting position: empty board, X to move.
pub fn new_game() -> TTTBoard {
    TTTBoard::new()
}

/// The O-opens variant: one random O mark on the board, and X to move.
pub fn o_opening<R: Rng + ?Sized>(rng: &mut R) -> Result<TTTBoard, GameError> {
    let mut board = new_game();
    let a = random_move(&board, rng)?;
    board.place_mark(a, PlayerMark::Naught)?;
    Ok(board)
}

/// Alternate the two players from `board` until the game is over.
pub fn run_trial(
    board: TTTBoard,
    x: &mut dyn Player,
    o: &mut dyn Player,
) -> Result<TrialOutcome, GameError> {
    run_trial_with(board, x, o, |_, _| {})
}

/// Like [`run_trial`], calling `on_move` with the board after every move.
pub fn run_trial_with(
    mut board: TTTBoard,
    x: &mut dyn Player,
    o: &mut dyn Player,
    mut on_move: impl FnMut(&TTTBoard, TTTAddr),
) -> Result<TrialOutcome, GameError> {
    let cost_before = x.search_cost();
    let mut n_moves = 0;
    while !board.is_terminal() {
        let current_player = board.current_player();
        let action = match current_player {
            PlayerMark::Cross => x.play(&board)?,
            PlayerMark::Naught => o.play(&board)?,
        };
        board.make_move(action)?;
        n_moves += 1;
        debug!("Player {} played {}", current_player, action);
        on_move(&board, action);
    }
    let status = GameEndStatus::try_from(board.game_status())?;
    debug!("Game ended with {}", status);
    Ok(TrialOutcome {
        status,
        search_cost: x.search_cost() - cost_before,
        n_moves,
    })
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::player::{ttt_heuristic, ABAi, MinMaxAi, RandomAi};

    #[test]
    fn perfect_play_is_a_draw() {
        let mut x = MinMaxAi::new(ttt_heuristic, 9, 0);
        let mut o = ABAi::new(ttt_heuristic, 9, 0);
        let outcome = run_trial(new_game(), &mut x, &mut o).unwrap();
        assert_eq!(outcome.status, GameEndStatus::Draw);
        assert_eq!(outcome.n_moves, 9);
    }

    #[test]
    fn perfect_x_never_loses_to_random() {
        let mut x = ABAi::new(ttt_heuristic, 9, 0);
        let mut o = RandomAi::new(8);
        for _ in 0..30 {
            let outcome = run_trial(new_game(), &mut x, &mut o).unwrap();
            assert_ne!(outcome.status, GameEndStatus::O);
        }
    }

    #[test]
    fn o_opening_puts_one_o_down_and_x_moves() {
        let mut rng = StdRng::seed_from_u64(5);
        let b = o_opening(&mut rng).unwrap();
        assert_eq!(b.count(PlayerMark::Naught), 1);
        assert_eq!(b.count(PlayerMark::Cross), 0);
        assert_eq!(b.current_player(), PlayerMark::Cross);
    }

    #[test]
    fn reports_every_move() {
        let mut x = RandomAi::new(1);
        let mut o = RandomAi::new(2);
        let mut seen = vec![];
        let outcome = run_trial_with(new_game(), &mut x, &mut o, |_, a| seen.push(a)).unwrap();
        assert_eq!(seen.len(), outcome.n_moves);
        assert_eq!(outcome.search_cost, 0);
    }

    #[test]
    fn finished_board_is_returned_as_is() {
        use std::str::FromStr;
        let b = TTTBoard::from_str("xxxoo    ").unwrap();
        let mut x = RandomAi::new(1);
        let mut o = RandomAi::new(2);
        let outcome = run_trial(b, &mut x, &mut o).unwrap();
        assert_eq!(outcome.status, GameEndStatus::X);
        assert_eq!(outcome.n_moves, 0);
    }
}
