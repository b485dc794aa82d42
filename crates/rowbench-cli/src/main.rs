use clap::{Parser, Subcommand};
use std::process;

mod cmd;
mod output;

#[derive(Parser)]
#[command(name = "rowbench", version, about = "Billion row tournament engine")]
struct Cli {
    /// Disable console logging
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a deterministic dataset
    Generate(cmd::generate::GenerateArgs),
    /// Write the seed-42 sample datasets
    Samples(cmd::samples::SamplesArgs),
    /// Summarize a dataset
    Inspect(cmd::inspect::InspectArgs),
    /// Compute the reference output of a dataset
    Reference(cmd::reference::ReferenceArgs),
    /// Check a candidate output against a reference
    Validate(cmd::validate::ValidateArgs),
    /// Benchmark one candidate program
    Benchmark(cmd::benchmark::BenchmarkArgs),
    /// Benchmark every candidate of a tournament config and rank them
    Tournament(cmd::tournament::TournamentArgs),
}

fn main() {
    let cli = Cli::parse();
    if !cli.quiet {
        rowbench_console::init();
    }

    let result = match cli.command {
        Commands::Generate(args) => cmd::generate::run(args),
        Commands::Samples(args) => cmd::samples::run(args),
        Commands::Inspect(args) => cmd::inspect::run(args),
        Commands::Reference(args) => cmd::reference::run(args),
        Commands::Validate(args) => match cmd::validate::run(args) {
            Ok(true) => Ok(()),
            Ok(false) => process::exit(1),
            Err(e) => Err(e),
        },
        Commands::Benchmark(args) => cmd::benchmark::run(args),
        Commands::Tournament(args) => cmd::tournament::run(args),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
