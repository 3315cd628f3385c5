//! `collimate <file> [-d] [-v]`: convert a CSV into typed columns on disk.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use collimate::engine::{collimate, CollimateObserver, CollimateOptions, StdErrObserver};
use collimate::ingestion::read_rows_from_path;
use collimate::output::{output_dir_for, project, write_artifacts};

/// Convert a CSV into typed, dictionary-encoded columns.
///
/// Output is written into a directory named after the input file's base name,
/// created if absent.
#[derive(Debug, Parser)]
#[command(name = "collimate", version)]
struct Args {
    /// Input CSV file.
    file: PathBuf,

    /// Auto-detect dates and normalize to ISO 8601 (`YYYY-MM-DD`).
    #[arg(short = 'd', long = "date")]
    date: bool,

    /// Print information about what we're doing.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("collimate: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> collimate::CollimateResult<()> {
    let rows = read_rows_from_path(&args.file)?;

    let observer: Option<Arc<dyn CollimateObserver>> = if args.verbose {
        Some(Arc::new(StdErrObserver))
    } else {
        None
    };
    let options = CollimateOptions {
        normalize_dates: args.date,
        observer,
    };
    let result = collimate(&rows, &options);

    let dir = output_dir_for(&args.file);
    let artifacts = project(&result);
    write_artifacts(&dir, &artifacts)?;

    if args.verbose {
        eprintln!(
            "[collimate] wrote {} column file(s) to {}",
            artifacts.len(),
            dir.display()
        );
    }
    Ok(())
}
