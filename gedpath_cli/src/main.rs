//! gedpath CLI
//!
//! Entry point for the `gedpath` command-line tool. Loads graph collections and
//! engine runs, extracts edit paths, scores graph pairs and checks stored paths.
//! Results go to stdout (or `--output`); logs go to stderr, filtered by `RUST_LOG`.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use gedpath_common::Config;
use gedpath_driver::{Dataset, RunFileEngine, extract_pair, score_pairs, write_scores};
use gedpath_extract::{EditPath, verify};
use tracing::info;

use args::{Args, Command, ExtractArgs, ScoreArgs, VerifyArgs};

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn run_extract(args: &ExtractArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::open(&args.dataset.dataset, &args.dataset.collection)?;
    let engine = RunFileEngine::from_path(&args.runs)?;
    let pair = args.pair();

    let path = extract_pair(&dataset, &engine, config.method, pair)?;
    info!(
        "graphs {} -> {}: {} bound {}, edit cost {} ({} operations)",
        pair.graph1,
        pair.graph2,
        config.method,
        path.graph_edit_distance,
        path.edit_cost(),
        path.edit_operations_count
    );

    if config.verify_paths {
        verify(&path, &*dataset.graph(pair.graph1)?, &*dataset.graph(pair.graph2)?)?;
        info!("edit path verified");
    }

    let mut out = open_output(args.output.as_deref())?;
    writeln!(out, "{}", path.to_json(config.pretty)?)?;
    out.flush()?;
    Ok(())
}

fn run_score(args: &ScoreArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Reject unusable methods before touching any file.
    gedpath_driver::approximation_bound(config.method)?;

    let dataset = Dataset::open(&args.dataset.dataset, &args.dataset.collection)?;
    let engine = RunFileEngine::from_path(&args.runs)?;

    let scores = score_pairs(&dataset, &engine, config)?;
    info!("scored {} pairs", scores.len());

    let mut out = open_output(args.output.as_deref())?;
    write_scores(&scores, args.format.into(), config.pretty, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_verify(args: &VerifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::open(&args.dataset.dataset, &args.dataset.collection)?;
    let source = dataset.graph(args.graph1)?;
    let target = dataset.graph(args.graph2)?;

    let path: EditPath = serde_json::from_reader(BufReader::new(File::open(&args.path)?))?;
    verify(&path, &source, &target)?;

    println!(
        "edit path verified: {} operations, cost {}, {} node matches, {} edge matches",
        path.edit_operations_count,
        path.edit_cost(),
        path.node_matches,
        path.edge_matches
    );
    Ok(())
}

/// Runs the selected subcommand.
///
/// Any error (bad index, unknown method, unreadable file, failed verification)
/// ends the process with a non-zero status before output is written.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args.to_config();

    let result = match &args.command {
        Command::Extract(extract) => run_extract(extract, &config),
        Command::Score(score) => run_score(score, &config),
        Command::Verify(check) => run_verify(check),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
