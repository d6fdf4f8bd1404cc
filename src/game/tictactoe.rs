use std::str::FromStr;

use itertools::Itertools as _;
use serde::{Deserialize, Serialize};

use crate::core::{GameError, GameStatus, PlayerMark};

/// Represents a coordinate on the board
///
///  0 1 2
///  3 4 5
///  6 7 8
///
/// invariant: the number inside must be 0-8
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TTTAddr(pub usize);

impl std::fmt::Display for TTTAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// The 8 lines that win the game: 3 rows (top to bottom), 3 columns (left to right)
/// and two diagonals (first the one that points to southeast, then the one to southwest)
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The board entries from top left row wise to bottom right, and the mark that moves next.
///
/// The turn is stored, not derived from the mark counts, since the O-opens variant
/// starts from a position where O is one mark ahead and X is to move.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct TTTBoard {
    cells: [Option<PlayerMark>; 9],
    to_move: PlayerMark,
}

impl Default for TTTBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TTTBoard {
    /// Empty board, X to move.
    pub fn new() -> Self {
        Self {
            cells: [None; 9],
            to_move: PlayerMark::Cross,
        }
    }

    pub fn with_to_move(mut self, mark: PlayerMark) -> Self {
        self.to_move = mark;
        self
    }

    pub fn current_player(&self) -> PlayerMark {
        self.to_move
    }

    pub fn cells(&self) -> &[Option<PlayerMark>; 9] {
        &self.cells
    }

    pub fn get(&self, addr: TTTAddr) -> Option<PlayerMark> {
        self.cells.get(addr.0).copied().flatten()
    }

    /// All empty squares, in ascending order. Search tie-breaks rely on this order.
    pub fn valid_moves(&self) -> Vec<TTTAddr> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(num, &mark)| {
                if mark.is_none() {
                    Some(TTTAddr(num))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Place `marker` at `a` without touching whose turn it is.
    pub fn place_mark(&mut self, a: TTTAddr, marker: PlayerMark) -> Result<(), GameError> {
        self.check_playable(a)?;
        self.cells[a.0] = Some(marker);
        Ok(())
    }

    /// Clear a square again. Only meant to undo a `place_mark`.
    pub fn retract(&mut self, a: TTTAddr) -> Result<(), GameError> {
        match self.cells.get(a.0) {
            None => Err(GameError::OutOfRange { addr: a }),
            Some(None) => Err(GameError::NotOccupied { addr: a }),
            Some(Some(_)) => {
                self.cells[a.0] = None;
                Ok(())
            }
        }
    }

    /// Place the mark of the player to move, and pass the turn.
    pub fn make_move(&mut self, a: TTTAddr) -> Result<(), GameError> {
        self.place_mark(a, self.to_move)?;
        self.to_move = self.to_move.other();
        Ok(())
    }

    /// Undo a `make_move`: clear the square and hand the turn back.
    pub fn undo_move(&mut self, a: TTTAddr) -> Result<(), GameError> {
        self.retract(a)?;
        self.to_move = self.to_move.other();
        Ok(())
    }

    /// Unchecked write, for search code that only ever plays legal moves.
    pub(crate) fn set(&mut self, a: TTTAddr, mark: Option<PlayerMark>) {
        self.cells[a.0] = mark;
    }

    fn check_playable(&self, a: TTTAddr) -> Result<(), GameError> {
        if a.0 >= 9 {
            return Err(GameError::OutOfRange { addr: a });
        }
        if self.cells[a.0].is_some() {
            return Err(GameError::Occupied { addr: a });
        }
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    /// Does `mark` hold any full line?
    pub fn is_winner(&self, mark: PlayerMark) -> bool {
        WIN_LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == Some(mark)))
    }

    /// Is there a winner?
    pub fn winner(&self) -> Option<PlayerMark> {
        match (
            self.is_winner(PlayerMark::Cross),
            self.is_winner(PlayerMark::Naught),
        ) {
            (true, false) => Some(PlayerMark::Cross),
            (false, true) => Some(PlayerMark::Naught),
            (false, false) => None,
            // place_mark refuses to play on a decided board
            (true, true) => unreachable!("Logic error. Both win!?"),
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|q| q.is_some())
    }

    pub fn is_draw(&self) -> bool {
        self.is_full()
            && !self.is_winner(PlayerMark::Cross)
            && !self.is_winner(PlayerMark::Naught)
    }

    pub fn is_terminal(&self) -> bool {
        self.is_winner(PlayerMark::Cross) || self.is_winner(PlayerMark::Naught) || self.is_full()
    }

    pub fn game_status(&self) -> GameStatus {
        if let Some(p) = self.winner() {
            GameStatus::Won(p)
        } else if self.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::Undecided
        }
    }

    /// +1 if X won, -1 if O won, 0 for a draw. Only defined on finished games.
    pub fn utility(&self) -> Result<i32, GameError> {
        match self.game_status() {
            GameStatus::Won(mark) => Ok(mark.sign()),
            GameStatus::Draw => Ok(0),
            GameStatus::Undecided => Err(GameError::NotTerminal),
        }
    }

    /// Open-line count: every line without an O scores its X count,
    /// every line without an X scores minus its O count.
    pub fn heuristic(&self) -> i32 {
        WIN_LINES
            .iter()
            .map(|line| {
                let xs = self.count_in(line, PlayerMark::Cross);
                let os = self.count_in(line, PlayerMark::Naught);
                let mut score = 0;
                if os == 0 {
                    score += xs;
                }
                if xs == 0 {
                    score -= os;
                }
                score
            })
            .sum()
    }

    fn count_in(&self, line: &[usize; 3], mark: PlayerMark) -> i32 {
        line.iter().filter(|&&i| self.cells[i] == Some(mark)).count() as i32
    }

    pub fn count(&self, mark: PlayerMark) -> usize {
        self.cells.iter().filter(|&&q| q == Some(mark)).count()
    }
}

impl FromStr for TTTBoard {
    type Err = GameError;

    /// Nine characters, row wise. `x`, `o`, and blank (space or `.`).
    /// X moves next unless X is one mark ahead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| GameError::InvalidBoard {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 9 {
            return Err(invalid("expected exactly 9 squares"));
        }
        let mut cells = [None; 9];
        for (num, c) in chars.into_iter().enumerate() {
            cells[num] = match c {
                'x' | 'X' => Some(PlayerMark::Cross),
                'o' | 'O' => Some(PlayerMark::Naught),
                ' ' | '.' => None,
                _ => return Err(invalid("may only contain x, o, space or '.'")),
            };
        }
        let mut b = Self {
            cells,
            to_move: PlayerMark::Cross,
        };
        let xs = b.count(PlayerMark::Cross);
        let os = b.count(PlayerMark::Naught);
        if xs.abs_diff(os) > 1 {
            return Err(invalid("mark counts differ by more than one"));
        }
        if b.is_winner(PlayerMark::Cross) && b.is_winner(PlayerMark::Naught) {
            return Err(invalid("both marks hold a line"));
        }
        if xs > os {
            b.to_move = PlayerMark::Naught;
        }
        Ok(b)
    }
}

impl std::fmt::Display for TTTBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = |m: &Option<PlayerMark>| match m {
            None => ' ',
            Some(PlayerMark::Cross) => 'X',
            Some(PlayerMark::Naught) => 'O',
        };
        writeln!(f, " ------- ")?;
        for row in self.cells.chunks(3) {
            writeln!(f, "| {} |", row.iter().map(m).join(" "))?;
        }
        writeln!(f, " ------- ")
    }
}
