//! Streaming reference aggregation.
//!
//! A single pass over the dataset keeps one [`KeyAggregate`] per distinct
//! key, so memory grows with the key count and never with the row count.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use rowbench_core::{parse_measurement, KeyAggregate, ReferenceResult, Result, RowbenchError, Tenths};
use tracing::info;

/// Whole-dataset figures reported by [`ReferenceAggregator::finish_with_summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    /// Non-blank lines.
    pub rows: u64,
    /// Distinct keys.
    pub keys: usize,
    pub min: Tenths,
    pub max: Tenths,
    /// Mean over all rows, rounded like a per-key mean.
    pub mean: Tenths,
}

/// Incremental aggregator over dataset lines.
///
/// # Example
///
/// ```
/// use rowbench_dataset::ReferenceAggregator;
///
/// let mut aggregator = ReferenceAggregator::new();
/// for line in ["A=1.0", "B=2.0", "A=3.0"] {
///     aggregator.push_line(line.as_bytes()).unwrap();
/// }
/// let reference = aggregator.finish().unwrap();
/// assert_eq!(reference.to_output_string(), "A=1.0/2.0/3.0\nB=2.0/2.0/2.0\n");
/// ```
#[derive(Debug, Default)]
pub struct ReferenceAggregator {
    aggregates: HashMap<String, KeyAggregate>,
    line_number: u64,
    rows: u64,
}

impl ReferenceAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one line without its `\n` terminator.
    ///
    /// A trailing `\r` is ignored and blank lines are skipped, but both still
    /// advance the line counter used in error messages.
    pub fn push_line(&mut self, line: &[u8]) -> Result<()> {
        self.line_number += 1;
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            return Ok(());
        }

        let (key, value) = parse_measurement(line).ok_or_else(|| {
            RowbenchError::malformed(self.line_number, &String::from_utf8_lossy(line))
        })?;
        match self.aggregates.get_mut(key) {
            Some(aggregate) => aggregate.update(value),
            None => {
                self.aggregates
                    .insert(key.to_string(), KeyAggregate::new(value));
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// Number of rows aggregated so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Number of distinct keys seen so far.
    pub fn key_count(&self) -> usize {
        self.aggregates.len()
    }

    /// Finalizes into a sorted reference.
    ///
    /// # Errors
    ///
    /// [`RowbenchError::EmptyInput`] if no row was aggregated.
    pub fn finish(self) -> Result<ReferenceResult> {
        self.finish_with_summary().map(|(reference, _)| reference)
    }

    /// Finalizes and also reports whole-dataset figures.
    pub fn finish_with_summary(self) -> Result<(ReferenceResult, DatasetSummary)> {
        let sorted: BTreeMap<String, KeyAggregate> = self.aggregates.into_iter().collect();

        let mut totals: Option<KeyAggregate> = None;
        for aggregate in sorted.values() {
            match totals.as_mut() {
                Some(t) => t.merge(aggregate),
                None => totals = Some(aggregate.clone()),
            }
        }
        let totals = totals.ok_or(RowbenchError::EmptyInput)?;

        let reference = ReferenceResult::from_aggregates(&sorted)?;
        let summary = DatasetSummary {
            rows: self.rows,
            keys: reference.len(),
            min: totals.min,
            max: totals.max,
            mean: totals.finalize().mean,
        };
        Ok((reference, summary))
    }
}

/// Aggregates a whole stream.
///
/// Lines are read as bytes so invalid UTF-8 surfaces as a
/// [`RowbenchError::MalformedLine`] with its line number.
pub fn aggregate<R: BufRead>(reader: R) -> Result<ReferenceResult> {
    aggregate_with_summary(reader).map(|(reference, _)| reference)
}

/// Aggregates a whole stream and reports whole-dataset figures.
pub fn aggregate_with_summary<R: BufRead>(mut reader: R) -> Result<(ReferenceResult, DatasetSummary)> {
    let start = Instant::now();
    let mut aggregator = ReferenceAggregator::new();
    let mut buffer = Vec::with_capacity(128);
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let line = buffer.strip_suffix(b"\n").unwrap_or(&buffer);
        aggregator.push_line(line)?;
    }

    let (reference, summary) = aggregator.finish_with_summary()?;
    info!(
        event = "aggregate_end",
        rows = summary.rows,
        keys = summary.keys,
        elapsed_ms = start.elapsed().as_millis() as u64,
    );
    Ok((reference, summary))
}

/// Aggregates a dataset file.
pub fn aggregate_file(path: impl AsRef<Path>) -> Result<ReferenceResult> {
    let file = File::open(path)?;
    aggregate(BufReader::with_capacity(1 << 20, file))
}

/// Aggregates a dataset file and reports whole-dataset figures.
pub fn inspect_file(path: impl AsRef<Path>) -> Result<DatasetSummary> {
    let file = File::open(path)?;
    aggregate_with_summary(BufReader::with_capacity(1 << 20, file)).map(|(_, summary)| summary)
}
