#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::process::ExitCode;

use chess_rules::{board::STANDARD_NOTATION, fuzz::fuzz, game::Game, repl::repl, team::Team};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Play chess in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Starting position, optionally followed by `w` or `b` for the team to
    /// move.
    #[arg(long, default_value = STANDARD_NOTATION)]
    notation: String,
    /// View the board from black's side.
    #[arg(long)]
    black: bool,
    /// Play this many random plies against the reference move generator
    /// instead of starting a game.
    #[arg(long, value_name = "PLIES")]
    fuzz: Option<u64>,
    /// Seed for the random plies.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    if let Some(plies) = args.fuzz {
        return match fuzz(plies, args.seed) {
            Ok(report) => {
                println!(
                    "{} plies over {} finished games agreed",
                    report.plies, report.finished_games
                );
                ExitCode::SUCCESS
            }
            Err(mismatch) => {
                error!(seed = args.seed, "fuzz mismatch");
                eprintln!("Error: {mismatch}");
                ExitCode::FAILURE
            }
        };
    }
    let game = match Game::new(&args.notation) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let view = if args.black { Team::Black } else { Team::White };
    if let Err(err) = repl(game, view) {
        error!(%err, "console closed unexpectedly");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
