use crate::game::tictactoe::TTTBoard;

/// No position scores more than 3 marks on each of the 8 lines.
pub const HEURISTIC_SPAN: f64 = 25.0;

/// The open-line count of [`TTTBoard::heuristic`], scaled into (-1, 1) so that it
/// never competes with a proven win or loss.
pub fn ttt_heuristic(b: &TTTBoard) -> f64 {
    b.heuristic() as f64 / HEURISTIC_SPAN
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn stays_inside_the_unit_interval() {
        for s in ["         ", "    x    ", "x   x  o ", "xo  xo  o", "x o o  x "] {
            let h = ttt_heuristic(&TTTBoard::from_str(s).unwrap());
            assert!(h > -1.0 && h < 1.0, "{s}: {h}");
        }
    }

    #[test]
    fn favours_the_centre() {
        let centre = ttt_heuristic(&TTTBoard::from_str("    x    ").unwrap());
        let corner = ttt_heuristic(&TTTBoard::from_str("x        ").unwrap());
        let edge = ttt_heuristic(&TTTBoard::from_str(" x       ").unwrap());
        assert!(centre > corner);
        assert!(corner > edge);
    }
}
