use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ecg-batch",
    version,
    about = "ECG signal transformation pipelines",
    long_about = "Segment, resample, convolve and band-pass filter multi-channel ECG signals.\n\
                  Signals are read from JSON files holding a [channels x samples] array."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show channel count, length and per-channel statistics of a signal file
    Info(InfoArgs),
    /// Run a configured transform pipeline on a signal file
    Run(RunArgs),
    /// List available pipeline steps
    Steps(StepsArgs),
}

#[derive(Args)]
pub struct InfoArgs {
    /// Input signal file (JSON)
    #[arg(long)]
    pub input: String,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Input signal file (JSON)
    #[arg(long)]
    pub input: String,

    /// Pipeline configuration file (JSON)
    #[arg(long)]
    pub config: String,

    /// Sampling rate in Hz, overriding both the input file and the config
    #[arg(long)]
    pub sr: Option<f64>,

    /// Seed for random segmentation, overriding the config
    #[arg(long, env = "ECG_BATCH_SEED")]
    pub seed: Option<u64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Args)]
pub struct StepsArgs {
    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
