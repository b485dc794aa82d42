//! `rowbench generate` -- Generate a deterministic dataset.

use clap::Args;
use std::path::PathBuf;

use rowbench_dataset::{generate_file, GeneratorConfig, KeyUniverse, ValueRange};

use super::{describe, CmdResult};

/// Value of `--keys` selecting the builtin station list.
const BUILTIN_KEYS: &str = "builtin";

#[derive(Args)]
pub struct GenerateArgs {
    /// Seed of the pseudo-random stream
    #[arg(long)]
    seed: u64,
    /// Number of rows to write
    #[arg(long)]
    rows: u64,
    /// Key file (`name` or `name;lo;hi` per line), or `builtin`
    #[arg(long, default_value = BUILTIN_KEYS)]
    keys: String,
    /// Output dataset path
    #[arg(long)]
    out: PathBuf,
    /// Lower bound of values for keys without their own range
    #[arg(long, allow_negative_numbers = true)]
    lo: Option<f64>,
    /// Upper bound of values for keys without their own range
    #[arg(long, allow_negative_numbers = true)]
    hi: Option<f64>,
}

pub fn run(args: GenerateArgs) -> CmdResult {
    let universe = if args.keys == BUILTIN_KEYS {
        KeyUniverse::builtin()
    } else {
        KeyUniverse::load(&args.keys).map_err(describe)?
    };
    let range = match (args.lo, args.hi) {
        (None, None) => ValueRange::DEFAULT,
        (lo, hi) => ValueRange::new(
            lo.unwrap_or(ValueRange::DEFAULT.lo()),
            hi.unwrap_or(ValueRange::DEFAULT.hi()),
        )?,
    };

    let config = GeneratorConfig::new(args.seed, args.rows, universe).with_range(range);
    let stats = generate_file(&config, &args.out)?;

    println!("Generated dataset: {}", args.out.display());
    crate::output::print_kv("Rows:", &stats.rows.to_string());
    crate::output::print_kv("Bytes:", &stats.bytes.to_string());
    crate::output::print_kv("Keys:", &config.universe.len().to_string());
    crate::output::print_kv("Seed:", &args.seed.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &std::path::Path, rows: u64) -> GenerateArgs {
        GenerateArgs {
            seed: 9,
            rows,
            keys: BUILTIN_KEYS.to_string(),
            out: dir.join("m.txt"),
            lo: None,
            hi: None,
        }
    }

    #[test]
    fn test_generate_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        run(args(dir.path(), 500)).unwrap();
        let first = std::fs::read(dir.path().join("m.txt")).unwrap();
        run(args(dir.path(), 500)).unwrap();
        let second = std::fs::read(dir.path().join("m.txt")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.iter().filter(|&&b| b == b'\n').count(), 500);
    }

    #[test]
    fn test_zero_rows_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(args(dir.path(), 0)).unwrap_err();
        assert!(err.to_string().contains("Configuration error"), "{}", err);
    }

    #[test]
    fn test_keys_file_and_range() {
        let dir = tempfile::tempdir().unwrap();
        let keys = dir.path().join("keys.txt");
        std::fs::write(&keys, "# stations\nOslo\nLima;10.0;20.0\n").unwrap();
        let mut args = args(dir.path(), 200);
        args.keys = keys.display().to_string();
        args.lo = Some(-5.0);
        args.hi = Some(5.0);
        run(args).unwrap();

        let data = std::fs::read_to_string(dir.path().join("m.txt")).unwrap();
        for line in data.lines() {
            let (key, value) = line.split_once('=').unwrap();
            let value: f64 = value.parse().unwrap();
            match key {
                "Oslo" => assert!((-5.0..=5.0).contains(&value)),
                "Lima" => assert!((10.0..=20.0).contains(&value)),
                other => panic!("unexpected key {}", other),
            }
        }
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), 10);
        args.lo = Some(5.0);
        args.hi = Some(-5.0);
        assert!(run(args).is_err());
    }
}
