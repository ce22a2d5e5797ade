use clap::Parser;
use std::path::PathBuf;

/// Logic-flow document inspector and evaluator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the flow document (JSON) to load
    #[arg(value_name = "FLOW")]
    pub flow_path: Option<PathBuf>,

    /// Logic graph index within the document (default: 0)
    #[arg(short = 'g', long = "graph", value_name = "N", default_value_t = 0)]
    pub graph_index: usize,

    /// Evaluate every conversion node and print the results
    #[arg(short = 'e', long = "eval")]
    pub eval: bool,

    /// Write the round-tripped document to this path
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out_path: Option<PathBuf>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
