//! `sandpile` - stabilise a sandpile read from a CSV seed and write a PNG.
//!
//! ```bash
//! sandpile input/65_by_65_all_4.csv output/65_by_65_all_4.png --threads 4
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use sandpile_rust::io::{read_grid, write_png};
use sandpile_rust::{ConvergenceDriver, SimulationConfig, SweepStrategy, SEQUENTIAL_THRESHOLD};

/// Grids up to this many cells are dumped at debug verbosity.
const DEBUG_PRINT_LIMIT: usize = 64 * 64;

/// Abelian sandpile simulator
#[derive(Parser)]
#[command(name = "sandpile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Initial configuration (first record: width,height)
    input: PathBuf,

    /// Output PNG path
    output: PathBuf,

    /// Worker threads (default: one per logical CPU)
    #[arg(short, long, env = "SANDPILE_THREADS")]
    threads: Option<usize>,

    /// Rows at or below this count are swept sequentially
    #[arg(long, env = "SANDPILE_THRESHOLD", default_value_t = SEQUENTIAL_THRESHOLD)]
    threshold: usize,

    /// Sweep strategy: fork-join, chunked or single
    #[arg(long, default_value_t = SweepStrategy::ForkJoin)]
    strategy: SweepStrategy,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> sandpile_rust::Result<()> {
    let mut config = SimulationConfig::new()
        .with_threshold(cli.threshold)
        .with_strategy(cli.strategy);
    if let Some(threads) = cli.threads {
        config = config.with_workers(threads);
    }

    let grid = read_grid(&cli.input)?;
    let cells = grid.rows() * grid.cols();
    if cells <= DEBUG_PRINT_LIMIT {
        debug!("starting configuration:\n{}", grid);
    }

    let mut driver = ConvergenceDriver::new(grid, config)?;
    let (steps, elapsed) = timed(|| driver.run());

    let grid = driver.into_grid();
    if cells <= DEBUG_PRINT_LIMIT {
        debug!("stable configuration:\n{}", grid);
    }

    if !cli.quiet {
        println!("Simulation complete, writing image...");
    }
    write_png(&grid, &cli.output)?;

    if !cli.quiet {
        println!("\t Rows: {}, Columns: {}", grid.rows(), grid.cols());
        println!("Number of steps to stable state: {}", steps);
        println!("Time: {} ms", elapsed.as_millis());
    }
    Ok(())
}

// 計測はグローバル変数ではなく呼び出し側のスコープで行う
fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}
