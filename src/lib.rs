//! Minimax, alpha-beta and flat Monte Carlo move selection for tic-tac-toe, and the
//! experiments that pit them against a random opponent.

pub mod core;
pub mod experiment;
pub mod game;
pub mod player;
pub mod search;
