//! Fixed sample datasets for local testing.

use std::path::{Path, PathBuf};

use rowbench_core::Result;

use crate::generator::{generate_file, GenerateStats, GeneratorConfig};
use crate::universe::KeyUniverse;

/// Seed shared by every sample dataset.
pub const SAMPLE_SEED: u64 = 42;

/// `(rows, file name)` of each sample dataset.
pub const SAMPLE_SIZES: &[(u64, &str)] = &[
    (1_000, "sample-1k.txt"),
    (10_000, "sample-10k.txt"),
    (100_000, "sample-100k.txt"),
    (1_000_000, "sample-1m.txt"),
];

/// A written sample file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFile {
    pub path: PathBuf,
    pub stats: GenerateStats,
}

/// Writes every sample dataset into `dir` using the builtin universe.
pub fn generate_samples(dir: impl AsRef<Path>) -> Result<Vec<SampleFile>> {
    generate_samples_up_to(dir, u64::MAX)
}

/// Like [`generate_samples`], skipping sizes above `max_rows`.
pub fn generate_samples_up_to(dir: impl AsRef<Path>, max_rows: u64) -> Result<Vec<SampleFile>> {
    let dir = dir.as_ref();
    let universe = KeyUniverse::builtin();
    SAMPLE_SIZES
        .iter()
        .filter(|(rows, _)| *rows <= max_rows)
        .map(|&(rows, name)| {
            let config = GeneratorConfig::new(SAMPLE_SEED, rows, universe.clone());
            let path = dir.join(name);
            let stats = generate_file(&config, &path)?;
            Ok(SampleFile { path, stats })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_samples_are_reproducible() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let a = generate_samples_up_to(first.path(), 10_000).unwrap();
        let b = generate_samples_up_to(second.path(), 10_000).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].stats.rows, 1_000);
        assert_eq!(a[1].path.file_name().unwrap(), "sample-10k.txt");
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(
                std::fs::read(&x.path).unwrap(),
                std::fs::read(&y.path).unwrap()
            );
        }
    }
}
