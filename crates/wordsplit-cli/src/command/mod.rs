use clap::{Parser, Subcommand};
use tracing::Level;

use self::{build_dataset::BuildDatasetArg, history::HistoryArg, train::TrainArg};

mod build_dataset;
mod history;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Maximum level of log messages written to stderr
    #[arg(long, global = true, default_value_t = Level::INFO)]
    log_level: Level,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a word classifier for a dataset
    Train(#[clap(flatten)] TrainArg),
    /// List recorded runs
    History(#[clap(flatten)] HistoryArg),
    /// Build a dataset from labeled documents
    BuildDataset(#[clap(flatten)] BuildDatasetArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::History(arg) => history::run(&arg)?,
        Mode::BuildDataset(arg) => build_dataset::run(&arg)?,
    }
    Ok(())
}
