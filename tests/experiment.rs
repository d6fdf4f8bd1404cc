//! Integration test: whole experiments against the random opponent
use oxo_search::experiment::{run_experiment, Algorithm, ExperimentConfig, Starter};

fn run(algorithm: Algorithm, param: usize, starter: Starter, games: usize) -> (usize, usize, usize) {
    let r = run_experiment(ExperimentConfig {
        algorithm,
        param,
        starter,
        games,
        seed: 31337,
    })
    .unwrap();
    assert_eq!(r.wins + r.draws + r.losses, games);
    (r.wins, r.draws, r.losses)
}

#[test]
fn full_depth_search_never_loses_when_x_starts() {
    let (wins, _, losses) = run(Algorithm::AlphaBeta, 9, Starter::X, 50);
    assert_eq!(losses, 0);
    assert!(wins > 35);
}

#[test]
fn minimax_and_alpha_beta_play_the_same_games() {
    let mm = run(Algorithm::Minimax, 4, Starter::O, 40);
    let ab = run(Algorithm::AlphaBeta, 4, Starter::O, 40);
    assert_eq!(mm, ab);
}

#[test]
fn rollout_beats_random_play() {
    let (wins, _, losses) = run(Algorithm::Rollout, 100, Starter::X, 40);
    assert!(wins > losses * 4, "{wins} wins, {losses} losses");
}
