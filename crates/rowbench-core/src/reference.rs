//! Per-key aggregates and the canonical reference result.
//!
//! Output format, one line per key in ascending byte order:
//!
//! ```text
//! key=min/mean/max
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Write};

use crate::error::{Result, RowbenchError};
use crate::tenths::Tenths;

/// Mutable accumulator for one key.
///
/// Owned by the aggregator that processes a dataset. `count` is at least one
/// from construction on, so finalization never divides by zero. `sum` is wide
/// enough for `u64::MAX` observations at [`Tenths::LIMIT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAggregate {
    pub count: u64,
    pub sum: i128,
    pub min: Tenths,
    pub max: Tenths,
}

impl KeyAggregate {
    /// Starts an accumulator from its first observation.
    pub fn new(first: Tenths) -> Self {
        Self {
            count: 1,
            sum: i128::from(first.get()),
            min: first,
            max: first,
        }
    }

    /// Folds one more observation in.
    #[inline]
    pub fn update(&mut self, value: Tenths) {
        self.count += 1;
        self.sum += i128::from(value.get());
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Folds another accumulator for the same key in.
    pub fn merge(&mut self, other: &KeyAggregate) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Computes the final statistics, rounding the mean half-to-even.
    pub fn finalize(&self) -> KeyStats {
        KeyStats {
            min: self.min,
            mean: Tenths::mean_half_even(self.sum, self.count),
            max: self.max,
        }
    }
}

/// Finalized statistics for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStats {
    pub min: Tenths,
    pub mean: Tenths,
    pub max: Tenths,
}

impl KeyStats {
    pub fn new(min: Tenths, mean: Tenths, max: Tenths) -> Self {
        Self { min, mean, max }
    }

    /// Returns true if `min <= mean <= max`.
    pub fn is_consistent(&self) -> bool {
        self.min <= self.mean && self.mean <= self.max
    }
}

impl fmt::Display for KeyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.min, self.mean, self.max)
    }
}

/// Ground truth for one dataset.
///
/// Keys iterate in byte-wise ascending order (the `Ord` of `str`), which is
/// the order candidates must reproduce. There is no mutating API: once built,
/// a reference is shared read-only across every candidate it checks.
///
/// # Example
///
/// ```
/// use rowbench_core::{KeyAggregate, ReferenceResult, Tenths};
/// use std::collections::BTreeMap;
///
/// let mut aggregates = BTreeMap::new();
/// let mut a = KeyAggregate::new(Tenths::new(10));
/// a.update(Tenths::new(30));
/// aggregates.insert("A".to_string(), a);
/// aggregates.insert("B".to_string(), KeyAggregate::new(Tenths::new(20)));
///
/// let reference = ReferenceResult::from_aggregates(&aggregates).unwrap();
/// assert_eq!(reference.to_output_string(), "A=1.0/2.0/3.0\nB=2.0/2.0/2.0\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceResult {
    entries: BTreeMap<String, KeyStats>,
}

impl ReferenceResult {
    /// Finalizes a set of accumulators.
    ///
    /// # Errors
    ///
    /// Returns [`RowbenchError::EmptyInput`] if there are no keys.
    pub fn from_aggregates(aggregates: &BTreeMap<String, KeyAggregate>) -> Result<Self> {
        let entries = aggregates
            .iter()
            .map(|(key, agg)| (key.clone(), agg.finalize()))
            .collect();
        Self::from_stats(entries)
    }

    /// Wraps already finalized statistics.
    ///
    /// # Errors
    ///
    /// Returns [`RowbenchError::EmptyInput`] if `entries` is empty.
    pub fn from_stats(entries: BTreeMap<String, KeyStats>) -> Result<Self> {
        if entries.is_empty() {
            return Err(RowbenchError::EmptyInput);
        }
        Ok(Self { entries })
    }

    /// Loads a reference from a file in the output format.
    ///
    /// Blank lines are skipped. Every other line must be `key=min/mean/max`
    /// with one-decimal values and `min <= mean <= max`, and keys must be
    /// strictly ascending.
    pub fn parse<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut previous: Option<String> = None;
        let mut buf = Vec::new();
        let mut line_number = 0u64;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;
            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            if raw.is_empty() {
                continue;
            }
            let line = std::str::from_utf8(raw)
                .map_err(|_| RowbenchError::malformed(line_number, &String::from_utf8_lossy(raw)))?;

            let (key, stats) = parse_output_line(line)
                .filter(|(_, stats)| stats.is_consistent())
                .ok_or_else(|| RowbenchError::malformed(line_number, line))?;

            if let Some(prev) = &previous {
                if prev.as_str() >= key {
                    return Err(RowbenchError::malformed(line_number, line));
                }
            }
            previous = Some(key.to_string());
            entries.insert(key.to_string(), stats);
        }

        Self::from_stats(entries)
    }

    /// Parses a reference from an in-memory string.
    pub fn parse_str(s: &str) -> Result<Self> {
        Self::parse(s.as_bytes())
    }

    /// Returns the statistics for a key.
    pub fn get(&self, key: &str) -> Option<&KeyStats> {
        self.entries.get(key)
    }

    /// Returns true if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed reference; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates keys and statistics in ascending key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, KeyStats> {
        self.entries.iter()
    }

    /// Iterates keys in ascending order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, KeyStats> {
        self.entries.keys()
    }

    /// Writes the canonical output, one `key=min/mean/max` line per key.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (key, stats) in &self.entries {
            writeln!(writer, "{}={}", key, stats)?;
        }
        writer.flush()
    }

    /// Renders the canonical output as a string.
    pub fn to_output_string(&self) -> String {
        let mut output = String::new();
        for (key, stats) in &self.entries {
            output.push_str(key);
            output.push('=');
            output.push_str(&stats.to_string());
            output.push('\n');
        }
        output
    }
}

impl<'a> IntoIterator for &'a ReferenceResult {
    type Item = (&'a String, &'a KeyStats);
    type IntoIter = btree_map::Iter<'a, String, KeyStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Parses one strict output line into key and statistics.
///
/// Does not check `min <= mean <= max`.
pub fn parse_output_line(line: &str) -> Option<(&str, KeyStats)> {
    let (key, values) = line.split_once('=')?;
    if key.is_empty() || values.contains('=') {
        return None;
    }
    let mut fields = values.split('/');
    let min = Tenths::parse(fields.next()?)?;
    let mean = Tenths::parse(fields.next()?)?;
    let max = Tenths::parse(fields.next()?)?;
    if fields.next().is_some() {
        return None;
    }
    Some((key, KeyStats::new(min, mean, max)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: i64) -> Tenths {
        Tenths::new(raw)
    }

    #[test]
    fn test_aggregate_update_and_finalize() {
        let mut agg = KeyAggregate::new(t(10));
        agg.update(t(30));
        agg.update(t(-5));
        assert_eq!(agg.count, 3);
        assert_eq!(agg.sum, 35);
        assert_eq!(agg.min, t(-5));
        assert_eq!(agg.max, t(30));
        // 3.5 / 3 = 1.166.. -> 1.2
        assert_eq!(agg.finalize(), KeyStats::new(t(-5), t(12), t(30)));
    }

    #[test]
    fn test_aggregate_merge() {
        let mut left = KeyAggregate::new(t(10));
        let mut right = KeyAggregate::new(t(-20));
        right.update(t(40));
        left.merge(&right);
        assert_eq!(left.count, 3);
        assert_eq!(left.sum, 30);
        assert_eq!(left.min, t(-20));
        assert_eq!(left.max, t(40));
    }

    #[test]
    fn test_parse_round_trip() {
        let text = "A=1.0/2.0/3.0\nB=-2.0/-2.0/-2.0\n";
        let reference = ReferenceResult::parse_str(text).unwrap();
        assert_eq!(reference.len(), 2);
        assert_eq!(
            reference.get("B"),
            Some(&KeyStats::new(t(-20), t(-20), t(-20)))
        );
        assert_eq!(reference.to_output_string(), text);
    }

    #[test]
    fn test_parse_rejects_unsorted_keys() {
        let err = ReferenceResult::parse_str("B=1.0/1.0/1.0\nA=1.0/1.0/1.0\n").unwrap_err();
        assert!(matches!(
            err,
            RowbenchError::MalformedLine { line_number: 2, .. }
        ));
    }

    #[test]
    fn test_parse_rejects_duplicate_keys() {
        let err = ReferenceResult::parse_str("A=1.0/1.0/1.0\nA=1.0/1.0/1.0\n").unwrap_err();
        assert!(matches!(err, RowbenchError::MalformedLine { .. }));
    }

    #[test]
    fn test_parse_rejects_inconsistent_stats() {
        let err = ReferenceResult::parse_str("A=3.0/2.0/1.0\n").unwrap_err();
        assert!(matches!(
            err,
            RowbenchError::MalformedLine { line_number: 1, .. }
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_utf8_as_malformed() {
        let bytes: &[u8] = b"A=1.0/1.0/1.0\n\xff\xfe=1.0/1.0/1.0\n";
        let err = ReferenceResult::parse(bytes).unwrap_err();
        assert!(matches!(
            err,
            RowbenchError::MalformedLine { line_number: 2, .. }
        ));
    }

    #[test]
    fn test_aggregate_sum_does_not_overflow() {
        let top = Tenths::new(Tenths::LIMIT);
        let mut agg = KeyAggregate::new(top);
        for _ in 0..1_000 {
            agg.update(top);
        }
        let mut total = agg.clone();
        // ~1e9 rows of the largest value, far past i64::MAX in tenths
        for _ in 0..1_000_000 {
            total.merge(&agg);
        }
        assert!(total.sum > i128::from(i64::MAX));
        assert_eq!(total.finalize(), KeyStats::new(top, top, top));
    }

    #[test]
    fn test_parse_empty_is_empty_input() {
        let err = ReferenceResult::parse_str("\n\n").unwrap_err();
        assert!(matches!(err, RowbenchError::EmptyInput));
    }

    #[test]
    fn test_parse_output_line_shapes() {
        assert!(parse_output_line("A=1.0/2.0/3.0").is_some());
        assert!(parse_output_line("A=1.0/2.0").is_none());
        assert!(parse_output_line("A=1.0/2.0/3.0/4.0").is_none());
        assert!(parse_output_line("=1.0/2.0/3.0").is_none());
        assert!(parse_output_line("A=B=1.0/2.0/3.0").is_none());
        assert!(parse_output_line("A=1.00/2.0/3.0").is_none());
    }

    #[test]
    fn test_keys_sort_bytewise() {
        let mut aggregates = BTreeMap::new();
        for key in ["b", "B", "Ä", "a"] {
            aggregates.insert(key.to_string(), KeyAggregate::new(t(0)));
        }
        let reference = ReferenceResult::from_aggregates(&aggregates).unwrap();
        let keys: Vec<&str> = reference.keys().map(String::as_str).collect();
        // uppercase < lowercase < multi-byte in byte order
        assert_eq!(keys, vec!["B", "a", "b", "Ä"]);
    }
}
