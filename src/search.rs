//! Depth limited game tree search, shared by the plain minimax and the alpha-beta players.
//!
//! X maximizes and O minimizes. Finished games score exactly +1, 0 or -1; positions cut off
//! by the depth limit are scored by a [`HeuristicFn`], which must stay strictly inside (-1, 1)
//! so that a proven result always outranks an estimate.
//!
//! The tree is walked on a single board that is mutated in place and restored after each
//! child, so siblings never see each other's moves. With a [`Window`] the walk stops looking
//! at siblings once `beta <= alpha`. The chosen move and the root value are the same with and
//! without the window, only the node count changes.

use crate::core::PlayerMark;
use crate::game::tictactoe::{TTTAddr, TTTBoard};

/// Scores a position that is not finished, from X's point of view.
pub type HeuristicFn = fn(&TTTBoard) -> f64;

/// The value of a node, and the move that reaches it.
/// `best` is `None` at leaves: finished games and depth-limit cutoffs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub value: f64,
    pub best: Option<TTTAddr>,
}

/// Performance counters. If we prune well, these numbers are small
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_visited: u64,
    pub leaves_evaluated: u64,
}

/// The alpha-beta bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub alpha: f64,
    pub beta: f64,
}

impl Window {
    pub fn full() -> Self {
        Window {
            alpha: -f64::INFINITY,
            beta: f64::INFINITY,
        }
    }
}

/// Search `board` for the player to move, `depth` plies deep.
///
/// `window: None` is exhaustive minimax; `Some(Window::full())` is alpha-beta.
pub fn search(
    board: &TTTBoard,
    depth: usize,
    window: Option<Window>,
    heuristic: HeuristicFn,
    stats: &mut SearchStats,
) -> SearchResult {
    let mut scratch = *board;
    let maximizing = board.current_player() == PlayerMark::Cross;
    descend(&mut scratch, depth, maximizing, window, heuristic, stats)
}

fn descend(
    node: &mut TTTBoard,
    depth: usize,
    maximizing: bool,
    mut window: Option<Window>,
    heuristic: HeuristicFn,
    stats: &mut SearchStats,
) -> SearchResult {
    stats.nodes_visited += 1;
    if let Ok(utility) = node.utility() {
        stats.leaves_evaluated += 1;
        return SearchResult {
            value: utility as f64,
            best: None,
        };
    }
    if depth == 0 {
        stats.leaves_evaluated += 1;
        return SearchResult {
            value: heuristic(node),
            best: None,
        };
    }

    let mark = if maximizing {
        PlayerMark::Cross
    } else {
        PlayerMark::Naught
    };
    let mut best = SearchResult {
        value: if maximizing {
            -f64::INFINITY
        } else {
            f64::INFINITY
        },
        best: None,
    };
    for addr in node.valid_moves() {
        node.set(addr, Some(mark));
        let child = descend(node, depth - 1, !maximizing, window, heuristic, stats);
        node.set(addr, None);

        // strict comparison: the first move in ascending order wins ties
        let improves = if maximizing {
            child.value > best.value
        } else {
            child.value < best.value
        };
        if improves {
            best = SearchResult {
                value: child.value,
                best: Some(addr),
            };
        }

        if let Some(w) = window.as_mut() {
            if maximizing {
                w.alpha = w.alpha.max(best.value);
            } else {
                w.beta = w.beta.min(best.value);
            }
            if w.beta <= w.alpha {
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    use super::*;
    use crate::game::o_opening;
    use crate::player::ttt_heuristic;

    /// A position reached by random play, from the empty board or from an O opening.
    fn random_position(rng: &mut StdRng) -> TTTBoard {
        let mut b = if rng.gen_bool(0.5) {
            o_opening(rng).unwrap()
        } else {
            TTTBoard::new()
        };
        let plies = rng.gen_range(1..9);
        for _ in 0..plies {
            if b.is_terminal() {
                break;
            }
            let a = *b.valid_moves().choose(rng).unwrap();
            b.make_move(a).unwrap();
        }
        b
    }

    #[test]
    fn finds_winning_move_at_depth_one() {
        let b = TTTBoard::from_str("xx oo    ").unwrap();
        let mut stats = SearchStats::default();
        for window in [None, Some(Window::full())] {
            let res = search(&b, 1, window, ttt_heuristic, &mut stats);
            assert_eq!(res.best, Some(TTTAddr(2)));
            assert_eq!(res.value, 1.0);
        }
    }

    #[test]
    fn a_win_outranks_any_estimate() {
        // O to move; square 2 blocks, square 5 wins on the spot
        let b = TTTBoard::from_str("xx oo   x").unwrap();
        let mut stats = SearchStats::default();
        let res = search(&b, 1, None, ttt_heuristic, &mut stats);
        assert_eq!(res.best, Some(TTTAddr(5)));
        assert_eq!(res.value, -1.0);
    }

    #[test]
    fn finished_game_has_no_move() {
        let b = TTTBoard::from_str("xo xo  ox").unwrap();
        let mut stats = SearchStats::default();
        let res = search(&b, 9, None, ttt_heuristic, &mut stats);
        assert_eq!(res, SearchResult { value: -1.0, best: None });
        assert_eq!(stats.nodes_visited, 1);
    }

    #[test]
    fn depth_zero_is_a_cutoff() {
        let b = TTTBoard::from_str("    x    ").unwrap();
        let mut stats = SearchStats::default();
        let res = search(&b, 0, Some(Window::full()), ttt_heuristic, &mut stats);
        assert_eq!(res.best, None);
        assert_eq!(res.value, ttt_heuristic(&b));
    }

    #[test]
    fn search_leaves_the_board_untouched() {
        let b = TTTBoard::from_str("x   o    ").unwrap();
        let copy = b;
        let mut stats = SearchStats::default();
        search(&b, 9, Some(Window::full()), ttt_heuristic, &mut stats);
        assert_eq!(b, copy);
    }

    #[test]
    fn empty_board_is_a_draw_under_perfect_play() {
        let mut stats = SearchStats::default();
        let res = search(&TTTBoard::new(), 9, Some(Window::full()), ttt_heuristic, &mut stats);
        assert_eq!(res.value, 0.0);
        assert_eq!(res.best, Some(TTTAddr(0)));
    }

    #[test]
    fn pruning_gives_the_same_answer_with_fewer_nodes() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut o_ahead = 0;
        for _ in 0..80 {
            let b = random_position(&mut rng);
            if b.count(PlayerMark::Naught) > b.count(PlayerMark::Cross) {
                o_ahead += 1;
            }
            for depth in 0..=9 {
                let mut plain = SearchStats::default();
                let mut pruned = SearchStats::default();
                let mm = search(&b, depth, None, ttt_heuristic, &mut plain);
                let ab = search(&b, depth, Some(Window::full()), ttt_heuristic, &mut pruned);
                assert_eq!(mm, ab, "depth {depth} on\n{b}");
                assert!(pruned.nodes_visited <= plain.nodes_visited);
            }
        }
        assert!(o_ahead > 0);
    }

    #[test]
    fn pruning_saves_work_from_the_empty_board() {
        let mut plain = SearchStats::default();
        let mut pruned = SearchStats::default();
        search(&TTTBoard::new(), 9, None, ttt_heuristic, &mut plain);
        search(&TTTBoard::new(), 9, Some(Window::full()), ttt_heuristic, &mut pruned);
        // 549946 nodes in the full tic-tac-toe game tree
        assert_eq!(plain.nodes_visited, 549_946);
        assert!(pruned.nodes_visited * 5 < plain.nodes_visited);
    }
}
