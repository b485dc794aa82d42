//! Deterministic measurement generator.
//!
//! Rows come from a [`ChaCha8Rng`] seeded with the configured seed. For every
//! row the key index is drawn first, then the value, so the output depends
//! only on `(seed, rows, universe, range)`.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rowbench_core::{Measurement, Result, RowbenchError, Tenths};
use tracing::info;

use crate::universe::{KeyUniverse, ValueRange};

/// Parameters of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub rows: u64,
    pub universe: KeyUniverse,
    /// Range for keys without their own.
    pub range: ValueRange,
}

impl GeneratorConfig {
    pub fn new(seed: u64, rows: u64, universe: KeyUniverse) -> Self {
        Self {
            seed,
            rows,
            universe,
            range: ValueRange::DEFAULT,
        }
    }

    pub fn with_range(mut self, range: ValueRange) -> Self {
        self.range = range;
        self
    }

    /// Rejects zero rows and an empty universe.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(RowbenchError::InvalidConfig(
                "row count must be at least 1".to_string(),
            ));
        }
        if self.universe.is_empty() {
            return Err(RowbenchError::InvalidConfig(
                "key universe is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lazily yields the rows of a dataset.
///
/// # Example
///
/// ```
/// use rowbench_dataset::{Generator, GeneratorConfig, KeyUniverse};
///
/// let universe = KeyUniverse::from_names(["A", "B"]).unwrap();
/// let config = GeneratorConfig::new(7, 3, universe);
/// let rows: Vec<String> = Generator::new(&config).unwrap().map(|m| m.to_string()).collect();
/// assert_eq!(rows.len(), 3);
/// ```
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    rng: ChaCha8Rng,
    remaining: u64,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            remaining: config.rows,
        })
    }

    fn draw(&mut self) -> (&'a str, Tenths) {
        let config = self.config;
        let keys = config.universe.as_slice();
        // Non-empty after validate().
        let spec = &keys[self.rng.random_range(0..keys.len())];
        let range = spec.range.unwrap_or(config.range);
        let raw = self
            .rng
            .random_range(range.lo_tenths().get()..=range.hi_tenths().get());
        (spec.name.as_str(), Tenths::new(raw))
    }
}

impl Iterator for Generator<'_> {
    type Item = Measurement;

    fn next(&mut self) -> Option<Measurement> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let (key, value) = self.draw();
        Some(Measurement::new(key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

/// Totals reported by [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerateStats {
    pub rows: u64,
    pub bytes: u64,
}

/// Streams a dataset to `writer`, one `key=value` line per row.
///
/// Nothing but a single line buffer is held in memory, so the row count is
/// bounded only by the writer. The caller should pass a buffered writer.
pub fn generate<W: Write>(config: &GeneratorConfig, mut writer: W) -> Result<GenerateStats> {
    let mut generator = Generator::new(config)?;
    let start = Instant::now();
    info!(
        event = "generate_start",
        seed = config.seed,
        rows = config.rows,
        keys = config.universe.len(),
    );

    let mut line = String::with_capacity(64);
    let mut stats = GenerateStats::default();
    for _ in 0..config.rows {
        let (key, value) = generator.draw();
        line.clear();
        // Writing into a String cannot fail.
        let _ = writeln!(line, "{}={}", key, value);
        writer.write_all(line.as_bytes())?;
        stats.rows += 1;
        stats.bytes += line.len() as u64;
    }
    writer.flush()?;

    info!(
        event = "generate_end",
        rows = stats.rows,
        bytes = stats.bytes,
        elapsed_ms = start.elapsed().as_millis() as u64,
    );
    Ok(stats)
}

/// Writes a dataset to a file, creating parent directories as needed.
pub fn generate_file(config: &GeneratorConfig, path: impl AsRef<Path>) -> Result<GenerateStats> {
    let path = path.as_ref();
    config.validate()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::with_capacity(1 << 20, File::create(path)?);
    generate(config, writer)
}

/// Renders a whole dataset into memory. Intended for small inputs.
pub fn generate_to_string(config: &GeneratorConfig) -> Result<String> {
    let mut buffer = Vec::new();
    generate(config, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| RowbenchError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
