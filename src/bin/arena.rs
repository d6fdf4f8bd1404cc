//! Runs the search experiments: each searcher plays X against a random O for many games.
//! Prints a results table, and optionally appends the results to a CSV file that
//! the `report` subcommand summarizes later.
//!

use std::io::Seek;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use enum_iterator::all;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};
use simple_logger::SimpleLogger;

use oxo_search::experiment::{
    grid, run_experiment_with, summarize, table_row, table_separator, Algorithm, ExperimentRecord,
    ExperimentConfig, ExperimentResult, Starter, TABLE_HEADER,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// More log output. Repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run experiments
    Run {
        /// Which searchers to test. All of them if not given
        #[arg(short, long)]
        algorithm: Vec<Algorithm>,

        /// Depth for the minimax variants, playouts per move for rollout.
        /// Defaults to 4 and 6 for minimax, 100 and 500 for rollout
        #[arg(short, long)]
        param: Vec<usize>,

        /// Who opens the game. Both if not given
        #[arg(short, long)]
        starter: Vec<Starter>,

        /// Games per experiment
        #[arg(short, long, default_value = "1000")]
        games: usize,

        /// The seed for the random number generators
        #[arg(long)]
        seed: Option<u64>,

        /// Append the results to this CSV file
        #[arg(short, long)]
        outfile: Option<PathBuf>,

        /// Print one JSON object per experiment instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Summarize the results recorded in a CSV file
    Report {
        #[arg(short, long, default_value = "experiments.csv")]
        outfile: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    SimpleLogger::new()
        .with_level(log_level(args.verbose))
        .init()?;
    match args.command {
        Commands::Run {
            algorithm,
            param,
            starter,
            games,
            seed,
            outfile,
            json,
        } => {
            let seed = seed.unwrap_or(StdRng::from_entropy().gen());
            eprintln!("Experiment seed: {}", seed);
            let algorithms = if algorithm.is_empty() {
                all::<Algorithm>().collect()
            } else {
                algorithm
            };
            let starters = if starter.is_empty() {
                all::<Starter>().collect()
            } else {
                starter
            };
            let configs = grid(&algorithms, &param, &starters, games, seed);
            if !json {
                println!("{}", TABLE_HEADER);
                println!("{}", table_separator());
            }
            for config in configs {
                let pb = experiment_progress(&config)?;
                let result = run_experiment_with(config, |_| pb.inc(1))?;
                pb.finish_with_message(format!("done in {:.2}s", result.elapsed.as_secs_f64()));
                if json {
                    let record = ExperimentRecord::new(&result, chrono::Local::now());
                    println!("{}", serde_json::to_string(&record)?);
                } else {
                    println!("{}", table_row(&result));
                }
                if let Some(path) = &outfile {
                    record_result(path, &result)?;
                }
            }
            Ok(())
        }
        Commands::Report { outfile, json } => print_out_report(&outfile, json),
    }
}

/// One bar per experiment, advancing with every finished game.
fn experiment_progress(config: &ExperimentConfig) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(config.games as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{prefix:.bold} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games {msg:.green}",
            )?
            .progress_chars("=>-"),
    );
    pb.set_prefix(format!(
        "{}({}) {} first",
        config.algorithm, config.param, config.starter
    ));
    Ok(pb)
}

fn record_result(outfile: &Path, result: &ExperimentResult) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(outfile)
        .with_context(|| format!("could not open {}", outfile.display()))?;
    let needs_headers = file.seek(std::io::SeekFrom::End(0))? == 0;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);
    wtr.serialize(ExperimentRecord::new(result, chrono::Local::now()))?;
    wtr.flush()?;
    Ok(())
}

fn print_out_report(outfile: &Path, json: bool) -> anyhow::Result<()> {
    let file = std::fs::File::open(outfile)
        .with_context(|| format!("The report file {} does not exist", outfile.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let records = rdr
        .deserialize()
        .collect::<Result<Vec<ExperimentRecord>, _>>()
        .with_context(|| format!("could not parse {}", outfile.display()))?;
    let summaries = summarize(&records);
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    println!(
        "| Algorithm  | Param | Starter | Runs |  Games | Win rate |  Wins | Draws | Losses |   Nodes avg |"
    );
    for s in summaries {
        println!(
            "| {:<10} | {:^5} | {:^7} | {:>4} | {:>6} | {:>8.3} | {:>5} | {:>5} | {:>6} | {:>11.2} |",
            s.algorithm.to_string(),
            s.param,
            s.starter.to_string(),
            s.runs,
            s.games,
            s.win_rate(),
            s.wins,
            s.draws,
            s.losses,
            s.avg_nodes
        );
    }
    Ok(())
}
