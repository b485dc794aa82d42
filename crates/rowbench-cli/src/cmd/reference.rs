//! `rowbench reference` -- Compute the reference output of a dataset.

use clap::Args;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use rowbench_dataset::aggregate_file;

use super::{describe, CmdResult};

#[derive(Args)]
pub struct ReferenceArgs {
    /// Dataset to aggregate
    #[arg(long)]
    input: PathBuf,
    /// Reference output path
    #[arg(long)]
    out: PathBuf,
}

pub fn run(args: ReferenceArgs) -> CmdResult {
    let reference = aggregate_file(&args.input).map_err(describe)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    reference.write_to(BufWriter::new(File::create(&args.out)?))?;

    println!("Reference written: {}", args.out.display());
    crate::output::print_kv("Keys:", &reference.len().to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowbench_test::{write_file, SCENARIO_INPUT, SCENARIO_REFERENCE};

    #[test]
    fn test_reference_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "m.txt", SCENARIO_INPUT);
        let out = dir.path().join("out/reference.txt");
        run(ReferenceArgs {
            input,
            out: out.clone(),
        })
        .unwrap();
        let written = fs::read_to_string(out).unwrap();
        assert_eq!(written.trim_end(), SCENARIO_REFERENCE);
    }

    #[test]
    fn test_empty_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "m.txt", "");
        let out = dir.path().join("reference.txt");
        let err = run(ReferenceArgs { input, out }).unwrap_err();
        assert!(err.to_string().contains("no measurements"), "{}", err);
    }
}
