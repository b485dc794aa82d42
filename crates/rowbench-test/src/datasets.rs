//! Dataset fixtures.

use std::path::{Path, PathBuf};

use rowbench_core::ReferenceResult;
use rowbench_dataset::{aggregate, generate_to_string, GeneratorConfig, KeyUniverse, ValueRange};

/// Three rows over two keys.
pub const SCENARIO_INPUT: &str = "A=1.0\nB=2.0\nA=3.0";

/// Reference output of [`SCENARIO_INPUT`], without trailing newline.
pub const SCENARIO_REFERENCE: &str = "A=1.0/2.0/3.0\nB=2.0/2.0/2.0";

/// Deterministic dataset over eight keys in `[-20.0, 40.0]`.
pub fn small_dataset(seed: u64, rows: u64) -> String {
    let names = ["Oslo", "Lima", "Cairo", "Perth", "Quito", "Hanoi", "Kyoto", "Sofia"];
    let universe = KeyUniverse::from_names(names).expect("fixture keys are valid");
    let range = ValueRange::new(-20.0, 40.0).expect("fixture range is valid");
    let config = GeneratorConfig::new(seed, rows, universe).with_range(range);
    generate_to_string(&config).expect("fixture dataset generates")
}

/// Aggregates an in-memory dataset.
pub fn reference_of(input: &str) -> ReferenceResult {
    aggregate(input.as_bytes()).expect("fixture dataset aggregates")
}

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_reference() {
        let reference = reference_of(SCENARIO_INPUT);
        assert_eq!(reference.to_output_string().trim_end(), SCENARIO_REFERENCE);
    }

    #[test]
    fn test_small_dataset_is_stable() {
        assert_eq!(small_dataset(1, 100), small_dataset(1, 100));
        assert_eq!(small_dataset(1, 100).lines().count(), 100);
    }
}
