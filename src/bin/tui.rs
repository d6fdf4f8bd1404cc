use std::num::NonZeroUsize;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};
use simple_logger::SimpleLogger;

use oxo_search::{
    core::Player,
    game::{new_game, o_opening, run_trial_with},
    player::{console::ConsolePlayer, ttt_heuristic, ABAi, MinMaxAi, RandomAi, RolloutAi},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum PlayerType {
    Console,
    Random,
    Minimax,
    AlphaBeta,
    Rollout,
}

/// A Tic-Tac-Toe game for the command line, with three kinds of AI to play against!
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Who plays X
    #[arg(long, default_value = "console")]
    x: PlayerType,

    /// Who plays O
    #[arg(long, default_value = "alpha-beta")]
    o: PlayerType,

    /// The depth of the minimax and alpha-beta searches
    #[arg(long, default_value = "9")]
    depth: usize,

    /// Random playouts per candidate move, for the rollout AI
    #[arg(long, default_value = "500")]
    simulations: usize,

    /// The seed for the random number generator (when used)
    #[arg(long)]
    seed: Option<u64>,

    /// Start with a random O mark on the board
    #[arg(long)]
    o_first: bool,

    /// Show the AIs' reasoning
    #[arg(short, long)]
    verbose: bool,
}

fn make_player(
    kind: PlayerType,
    name: &str,
    args: &Args,
    rng: &mut StdRng,
) -> anyhow::Result<Box<dyn Player>> {
    Ok(match kind {
        PlayerType::Console => Box::new(ConsolePlayer::new(name)),
        PlayerType::Random => Box::new(RandomAi::new(rng.gen())),
        PlayerType::Minimax => Box::new(MinMaxAi::new(ttt_heuristic, args.depth, rng.gen())),
        PlayerType::AlphaBeta => Box::new(ABAi::new(ttt_heuristic, args.depth, rng.gen())),
        PlayerType::Rollout => {
            let simulations =
                NonZeroUsize::new(args.simulations).context("--simulations must be at least 1")?;
            Box::new(RolloutAi::new(rng.gen(), simulations))
        }
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init()?;
    let seed = args.seed.unwrap_or(StdRng::from_entropy().gen());
    println!("AI seed: {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = make_player(args.x, "X", &args, &mut rng)?;
    let mut o = make_player(args.o, "O", &args, &mut rng)?;

    let board = if args.o_first {
        o_opening(&mut rng)?
    } else {
        new_game()
    };
    print!("{}", board);
    let outcome = run_trial_with(board, x.as_mut(), o.as_mut(), |b, a| {
        println!("{} took square {}", b.current_player().other(), a.0 + 1);
        print!("{}", b);
    })?;
    println!("{} after {} moves. Game over.", outcome.status, outcome.n_moves);
    Ok(())
}
