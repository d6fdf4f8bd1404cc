use std::io::BufRead;

use crate::core::{GameError, Player};
use crate::game::tictactoe::{TTTAddr, TTTBoard};

/// A human at the terminal.
pub struct ConsolePlayer {
    pub name: String,
}

impl ConsolePlayer {
    pub fn new(name: impl Into<String>) -> Self {
        ConsolePlayer { name: name.into() }
    }
}

/// Turn a typed line into a square. The human counts 1-9, the board 0-8.
pub fn parse_square(line: &str, b: &TTTBoard) -> Result<TTTAddr, String> {
    let num: usize = line
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", line.trim()))?;
    if !(1..=9).contains(&num) {
        return Err(format!("{num} is not in range 1-9"));
    }
    let a = TTTAddr(num - 1);
    if b.get(a).is_some() {
        return Err(format!("square {num} is taken"));
    }
    Ok(a)
}

impl Player for ConsolePlayer {
    fn play(&mut self, b: &TTTBoard) -> Result<TTTAddr, GameError> {
        if b.is_terminal() {
            return Err(GameError::GameOver);
        }
        println!("Time for {} to make a move", self.name);
        print!("{}", b);
        println!("Input a number 1-9 to make a move 1 = top left, 9 = bottom right");
        loop {
            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line) {
                Ok(0) | Err(_) => return Err(GameError::Abandoned),
                Ok(_) => {}
            }
            match parse_square(&line, b) {
                Ok(a) => return Ok(a),
                Err(msg) => eprintln!("{msg}"),
            }
        }
    }
}
