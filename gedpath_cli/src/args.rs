use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use gedpath_common::{Config, GedMethod, MethodError};
use gedpath_driver::{GraphPair, ScoreFormat};

/// gedpath - Derive and check graph edit paths from GED engine correspondences
#[derive(Parser, Debug)]
#[command(name = "gedpath")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract the edit path between two graphs of a collection
    Extract(ExtractArgs),
    /// Score every graph pair of a collection with one method
    Score(ScoreArgs),
    /// Replay a stored edit path and check that it yields graph 2
    Verify(VerifyArgs),
}

/// Where the graphs come from.
#[derive(ClapArgs, Debug, Clone)]
pub struct DatasetArgs {
    /// Directory holding the graph files
    #[arg(short = 'd', long)]
    pub dataset: PathBuf,

    /// Collection descriptor, relative to the dataset directory unless absolute
    #[arg(short = 'c', long, default_value = "collection.json")]
    pub collection: PathBuf,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Engine runs exported as JSON
    #[arg(short = 'r', long)]
    pub runs: PathBuf,

    /// GED method whose run is used
    #[arg(short = 'm', long, default_value = "IPFP", value_parser = parse_method)]
    pub method: GedMethod,

    /// Index of graph 1 in the collection
    pub graph1: usize,

    /// Index of graph 2 in the collection
    pub graph2: usize,

    /// Replay the extracted path before writing it
    #[arg(long, default_value_t = false)]
    pub verify: bool,

    /// Write single-line JSON
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Output file (stdout if omitted)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Engine runs exported as JSON
    #[arg(short = 'r', long)]
    pub runs: PathBuf,

    /// GED method to score
    #[arg(short = 'm', long, default_value = "IPFP", value_parser = parse_method)]
    pub method: GedMethod,

    /// First graph index considered
    #[arg(short = 's', long, default_value_t = 0)]
    pub start_index: usize,

    /// Extract and replay an edit path for every pair
    #[arg(long, default_value_t = false)]
    pub verify: bool,

    /// Score pairs one after another
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Write single-line JSON
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Output file (stdout if omitted)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Edit path JSON to check
    #[arg(short = 'p', long)]
    pub path: PathBuf,

    /// Index of graph 1 in the collection
    pub graph1: usize,

    /// Index of graph 2 in the collection
    pub graph2: usize,
}

fn parse_method(s: &str) -> Result<GedMethod, MethodError> {
    s.parse()
}

impl Args {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> Config {
        match &self.command {
            Command::Extract(args) => Config::builder()
                .method(args.method)
                .parallel(false)
                .verify_paths(args.verify)
                .pretty(!args.compact)
                .build(),
            Command::Score(args) => Config::builder()
                .method(args.method)
                .parallel(!args.sequential)
                .start_index(args.start_index)
                .verify_paths(args.verify)
                .pretty(!args.compact)
                .build(),
            Command::Verify(_) => Config::builder().parallel(false).verify_paths(true).build(),
        }
    }
}

impl ExtractArgs {
    pub const fn pair(&self) -> GraphPair {
        GraphPair::new(self.graph1, self.graph2)
    }
}

/// Command-line argument wrapper for ScoreFormat
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FormatArg {
    /// `METHOD=.. GRAPH1=.. GRAPH2=.. PREDGED=.. GTGED=.. RUNTIME=..` lines
    #[value(name = "text")]
    Text,
    #[value(name = "csv")]
    Csv,
    #[value(name = "json")]
    Json,
}

impl From<FormatArg> for ScoreFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Csv => Self::Csv,
            FormatArg::Json => Self::Json,
        }
    }
}
