//! Command-line harness for the echelon elimination engine.
//!
//! Mirrors the classic correctness-check flow: generate a random square
//! matrix, reduce a copy with the sequential reference (timed), reduce
//! another copy with the parallel engine, and compare the two buffers
//! within tolerance. Exit status reflects the outcome, so scripts can
//! assert on it.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};

use echelon_linalg::{
    check_unit_diagonal, compare_elements, eliminate_parallel, eliminate_sequential, DenseMatrix,
    EliminationError, EngineConfig,
};

#[derive(Debug, Parser)]
#[command(name = "echelon", about = "Barrier-synchronized parallel Gaussian elimination harness")]
struct Args {
    /// Width and height of the square input matrix.
    size: usize,

    /// Worker threads per elimination phase.
    #[arg(short, long, default_value_t = 4)]
    threads: usize,

    /// Seed for the input matrix generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Element-wise comparison tolerance.
    #[arg(long, default_value_t = 1e-6)]
    tolerance: f32,

    /// Lower bound of generated values (inclusive).
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    min_value: f32,

    /// Upper bound of generated values (inclusive).
    #[arg(long, default_value_t = 10.0)]
    max_value: f32,

    /// Generate a raw random matrix instead of a diagonally dominant one.
    /// Raw matrices may hit a zero pivot and fail as singular.
    #[arg(long)]
    raw: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_target(false).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => {
            info!("TEST PASSED");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("TEST FAILED: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), EliminationError> {
    if args.size == 0 {
        return Err(EliminationError::DimensionMismatch {
            reason: "matrix size must be positive".to_string(),
        });
    }
    if args.min_value > args.max_value {
        return Err(EliminationError::DimensionMismatch {
            reason: format!(
                "empty value range: [{}, {}]",
                args.min_value, args.max_value
            ),
        });
    }

    info!(
        size = args.size,
        threads = args.threads,
        seed = args.seed,
        "generating input matrix"
    );
    let input = if args.raw {
        DenseMatrix::<f32>::random(args.size, args.size, args.min_value, args.max_value, args.seed)
    } else {
        DenseMatrix::<f32>::random_diagonally_dominant(
            args.size,
            args.min_value,
            args.max_value,
            args.seed,
        )
    };

    let mut u_ref = input.clone();
    let mut u_par = input;

    let start = Instant::now();
    eliminate_sequential(&mut u_ref, 1e-9)?;
    info!(elapsed = ?start.elapsed(), "sequential reference elimination finished");
    check_unit_diagonal(&u_ref, args.tolerance)?;

    let config = EngineConfig {
        num_threads: args.threads,
        ..EngineConfig::default()
    };
    let start = Instant::now();
    eliminate_parallel(&mut u_par, &config)?;
    info!(
        elapsed = ?start.elapsed(),
        threads = config.num_threads.max(1),
        "parallel elimination finished"
    );

    compare_elements(u_ref.as_slice(), u_par.as_slice(), args.tolerance)?;
    info!(tolerance = args.tolerance, "parallel result matches the sequential oracle");
    Ok(())
}
