use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ricochet_board::generator::Generator;
use ricochet_board::{map, PositionEncoding};
use ricochet_solver::{Heuristic, Outcome, SearchLimits, Strategy};

/// Solve and generate multi robot ricochet puzzles.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve the puzzle stored in a JSON file.
    Solve {
        /// Path to the puzzle file.
        file: PathBuf,

        /// Search strategy: bfs, dfs or a-star.
        #[arg(short, long, default_value_t = Strategy::BreadthFirst)]
        strategy: Strategy,

        /// Estimate used by a-star: nearest-goal, own-goal or least-moves.
        #[arg(long, default_value_t = Heuristic::NearestGoal)]
        heuristic: Heuristic,

        /// Stop after expanding this many positions.
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Stop after searching for this many milliseconds.
        #[arg(long)]
        time_limit_ms: Option<u64>,

        /// Print the position of the moved robot after every move.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print a random puzzle as JSON.
    Generate {
        /// Seed of the random generator.
        #[arg(long)]
        seed: u128,

        /// Number of columns.
        #[arg(long, default_value_t = map::DEFAULT_SIDE_LENGTH)]
        width: PositionEncoding,

        /// Number of rows.
        #[arg(long, default_value_t = map::DEFAULT_SIDE_LENGTH)]
        height: PositionEncoding,

        /// Number of robots and goals.
        #[arg(long, default_value_t = ricochet_board::generator::DEFAULT_ROBOTS)]
        robots: usize,

        /// Number of wall segments, a tenth of the fields by default.
        #[arg(long)]
        walls: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Solve {
            file,
            strategy,
            heuristic,
            max_expansions,
            time_limit_ms,
            verbose,
        } => {
            let mut limits = SearchLimits::unlimited();
            limits.max_expansions = max_expansions;
            limits.time_limit = time_limit_ms.map(Duration::from_millis);
            solve(&file, strategy, heuristic, limits, verbose)
        }
        Command::Generate {
            seed,
            width,
            height,
            robots,
            walls,
        } => generate(seed, width, height, robots, walls),
    }
}

fn solve(
    file: &Path,
    strategy: Strategy,
    heuristic: Heuristic,
    limits: SearchLimits,
    verbose: bool,
) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("failed to read puzzle file {}", file.display()))?;
    let (board, start) = map::parse_puzzle(&json)
        .with_context(|| format!("failed to load puzzle from {}", file.display()))?;
    info!(
        "loaded a {}x{} board with {} robots from {}",
        board.width(),
        board.height(),
        start.len(),
        file.display()
    );

    let search = strategy
        .solver(limits, heuristic)
        .search(&board, start.clone())
        .with_context(|| format!("invalid start positions in {}", file.display()))?;
    info!(
        "{} expanded {} positions in {:.2?}",
        strategy, search.stats.expanded, search.stats.elapsed
    );

    let path = match &search.outcome {
        Outcome::Solved(path) => path,
        Outcome::Exhausted | Outcome::LimitReached => {
            println!("No solution found");
            return Ok(());
        }
    };

    println!("{}", path.len());
    for (move_n, (robot, dir)) in path.directions().iter().enumerate() {
        println!(" {:>2}  {:<8}{:<6}", move_n + 1, robot, dir);
    }

    if verbose {
        println!();
        println!("{}", start);
        for step in path.replay(&board) {
            println!("{}", step);
        }
    }

    Ok(())
}

fn generate(
    seed: u128,
    width: PositionEncoding,
    height: PositionEncoding,
    robots: usize,
    walls: Option<usize>,
) -> Result<()> {
    let mut gen = Generator::from_seed(seed, width, height).robots(robots);
    if let Some(walls) = walls {
        gen = gen.walls(walls);
    }

    let (board, start) = gen
        .generate_puzzle()
        .context("failed to generate a puzzle")?;
    println!("{}", map::to_json(&board, &start)?);

    Ok(())
}
