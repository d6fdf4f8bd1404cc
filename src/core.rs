//! The core abstractions for this application
//!

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::tictactoe::{TTTAddr, TTTBoard};

/// The two marks. Cross is X, and always maximizes. Naught is O.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerMark {
    Cross,
    Naught,
}

impl PlayerMark {
    pub fn other(&self) -> Self {
        match *self {
            Self::Cross => Self::Naught,
            Self::Naught => Self::Cross,
        }
    }

    /// +1 for Cross, -1 for Naught. Multiply a value in the X-positive convention by this
    /// to get the value seen from this mark.
    pub fn sign(&self) -> i32 {
        match *self {
            Self::Cross => 1,
            Self::Naught => -1,
        }
    }
}

impl Display for PlayerMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerMark::Cross => write!(f, "X"),
            PlayerMark::Naught => write!(f, "O"),
        }
    }
}

/// The Player trait is the struct that represents a player.
pub trait Player {
    /// The play function is the main mechanic for the AIs
    /// You observe the whole board through a reference, and return where to play.
    /// Asking for a move on a finished game is an error.
    fn play(&mut self, b: &TTTBoard) -> Result<TTTAddr, GameError>;

    /// Cumulative search cost spent by this player so far. Players that do not search report 0.
    fn search_cost(&self) -> u64 {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum GameStatus {
    Undecided,
    Draw,
    Won(PlayerMark),
}

#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum GameEndStatus {
    X,
    O,
    Draw,
}

impl Display for GameEndStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEndStatus::X => write!(f, "X won"),
            GameEndStatus::O => write!(f, "O won"),
            GameEndStatus::Draw => write!(f, "Draw"),
        }
    }
}

impl TryFrom<GameStatus> for GameEndStatus {
    type Error = GameError;

    fn try_from(status: GameStatus) -> Result<Self, Self::Error> {
        match status {
            GameStatus::Undecided => Err(GameError::NotTerminal),
            GameStatus::Draw => Ok(GameEndStatus::Draw),
            GameStatus::Won(PlayerMark::Cross) => Ok(GameEndStatus::X),
            GameStatus::Won(PlayerMark::Naught) => Ok(GameEndStatus::O),
        }
    }
}

/// Contract violations on the board and the players. None of these are transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid move: square {addr} is already occupied")]
    Occupied { addr: TTTAddr },

    #[error("cannot undo: square {addr} is empty")]
    NotOccupied { addr: TTTAddr },

    #[error("invalid move: square {addr} is outside the board")]
    OutOfRange { addr: TTTAddr },

    #[error("the game is not over yet")]
    NotTerminal,

    #[error("the game is already over")]
    GameOver,

    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("the player left the game")]
    Abandoned,

    #[error("invalid board '{input}': {reason}")]
    InvalidBoard { input: String, reason: String },
}
