//! `rowbench samples` -- Write the seed-42 sample datasets.

use clap::Args;
use std::path::PathBuf;

use rowbench_dataset::{generate_samples_up_to, SAMPLE_SEED};

use super::CmdResult;

#[derive(Args)]
pub struct SamplesArgs {
    /// Directory receiving sample-*.txt files
    #[arg(long, default_value = "data")]
    dir: PathBuf,
    /// Skip samples larger than this many rows
    #[arg(long, default_value_t = u64::MAX, hide_default_value = true)]
    max_rows: u64,
}

pub fn run(args: SamplesArgs) -> CmdResult {
    let samples = generate_samples_up_to(&args.dir, args.max_rows)?;
    println!(
        "Wrote {} sample datasets (seed {}) to {}",
        samples.len(),
        SAMPLE_SEED,
        args.dir.display()
    );
    for sample in &samples {
        crate::output::print_kv(
            &sample.path.display().to_string(),
            &format!("{} rows, {} bytes", sample.stats.rows, sample.stats.bytes),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_samples() {
        let dir = tempfile::tempdir().unwrap();
        run(SamplesArgs {
            dir: dir.path().to_path_buf(),
            max_rows: 10_000,
        })
        .unwrap();
        assert!(dir.path().join("sample-1k.txt").exists());
        assert!(dir.path().join("sample-10k.txt").exists());
        assert!(!dir.path().join("sample-100k.txt").exists());
    }
}
