//! `rowbench inspect` -- Summarize a dataset.

use clap::Args;
use std::path::PathBuf;

use rowbench_dataset::inspect_file;

use super::{describe, CmdResult};

#[derive(Args)]
pub struct InspectArgs {
    /// Dataset to scan
    #[arg(long)]
    input: PathBuf,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: InspectArgs) -> CmdResult {
    let summary = inspect_file(&args.input).map_err(describe)?;

    if args.json {
        crate::output::print_json(&serde_json::json!({
            "input": args.input.display().to_string(),
            "rows": summary.rows,
            "keys": summary.keys,
            "min": summary.min.as_f64(),
            "max": summary.max.as_f64(),
            "mean": summary.mean.as_f64(),
        }));
    } else {
        println!("Dataset: {}", args.input.display());
        crate::output::print_kv("Rows:", &summary.rows.to_string());
        crate::output::print_kv("Distinct keys:", &summary.keys.to_string());
        crate::output::print_kv("Min:", &summary.min.to_string());
        crate::output::print_kv("Max:", &summary.max.to_string());
        crate::output::print_kv("Mean:", &summary.mean.to_string());
    }
    Ok(())
}
