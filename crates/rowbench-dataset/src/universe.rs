//! Key universes and value ranges.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rowbench_core::{is_valid_key, Result, RowbenchError, Tenths};

use crate::stations::STATIONS;

/// Closed interval `[lo, hi]` of temperatures.
///
/// Bounds are held in tenths, so every drawn value lies inside the interval
/// the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    lo: Tenths,
    hi: Tenths,
}

impl ValueRange {
    /// Default range for keys without their own bounds.
    pub const DEFAULT: ValueRange = ValueRange {
        lo: Tenths::new(-999),
        hi: Tenths::new(999),
    };

    /// Creates a range, snapping `lo` up and `hi` down to the nearest tenth.
    ///
    /// # Errors
    ///
    /// Rejects bounds that are not representable temperatures and ranges
    /// that contain no one-decimal value, such as `lo > hi` or `[0.04, 0.04]`.
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        let (Some(lo_tenths), Some(hi_tenths)) = (snap(lo, f64::ceil), snap(hi, f64::floor)) else {
            return Err(RowbenchError::InvalidConfig(format!(
                "value range bounds must be finite temperatures, got [{}, {}]",
                lo, hi
            )));
        };
        if lo_tenths > hi_tenths {
            return Err(RowbenchError::InvalidConfig(format!(
                "value range [{}, {}] contains no one-decimal temperature",
                lo, hi
            )));
        }
        Ok(Self {
            lo: lo_tenths,
            hi: hi_tenths,
        })
    }

    fn from_degrees(lo: i8, hi: i8) -> Self {
        Self {
            lo: Tenths::new(i64::from(lo) * 10),
            hi: Tenths::new(i64::from(hi) * 10),
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo.as_f64()
    }

    pub fn hi(&self) -> f64 {
        self.hi.as_f64()
    }

    /// Lower bound in tenths.
    pub fn lo_tenths(&self) -> Tenths {
        self.lo
    }

    /// Upper bound in tenths.
    pub fn hi_tenths(&self) -> Tenths {
        self.hi
    }
}

/// Scales to tenths and rounds with `round`, treating values within float
/// noise of a whole tenth as exact.
fn snap(value: f64, round: fn(f64) -> f64) -> Option<Tenths> {
    if !value.is_finite() {
        return None;
    }
    let scaled = value * 10.0;
    let nearest = scaled.round();
    let snapped = if (scaled - nearest).abs() < 1e-6 {
        nearest
    } else {
        round(scaled)
    };
    if snapped.abs() > Tenths::LIMIT as f64 {
        return None;
    }
    Some(Tenths::new(snapped as i64))
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One key of a universe, optionally with its own value range.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySpec {
    pub name: String,
    pub range: Option<ValueRange>,
}

impl KeySpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: None,
        }
    }

    pub fn with_range(mut self, range: ValueRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Ordered list of keys rows are drawn from.
///
/// Order matters: the generator draws an index into this list, so the same
/// names in a different order produce a different dataset. Duplicates are
/// allowed and raise that key's weight.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyUniverse {
    keys: Vec<KeySpec>,
}

impl KeyUniverse {
    /// Builds a universe, rejecting invalid key names.
    pub fn new(keys: Vec<KeySpec>) -> Result<Self> {
        for spec in &keys {
            if !is_valid_key(&spec.name) {
                return Err(RowbenchError::InvalidConfig(format!(
                    "invalid key {:?}: keys must be non-empty and contain no '=' or line breaks",
                    spec.name
                )));
            }
        }
        Ok(Self { keys })
    }

    /// Builds a universe from plain names that share the global range.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(KeySpec::new).collect())
    }

    /// The builtin weather station universe with per-station ranges.
    pub fn builtin() -> Self {
        let keys = STATIONS
            .iter()
            .map(|&(name, lo, hi)| KeySpec {
                name: name.to_string(),
                range: Some(ValueRange::from_degrees(lo, hi)),
            })
            .collect();
        Self { keys }
    }

    /// Parses a keys file.
    ///
    /// One key per line. A line may be `name;lo;hi` to give the key its own
    /// range. Blank lines and lines starting with `#` are ignored.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut keys = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            keys.push(parse_key_line(line, index as u64 + 1)?);
        }
        Self::new(keys)
    }

    /// Loads a keys file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KeySpec> {
        self.keys.get(index)
    }

    pub fn as_slice(&self) -> &[KeySpec] {
        &self.keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeySpec> {
        self.keys.iter()
    }
}

fn parse_key_line(line: &str, line_number: u64) -> Result<KeySpec> {
    let mut parts = line.split(';');
    let name = parts.next().unwrap_or_default();
    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => Ok(KeySpec::new(name)),
        (Some(lo), Some(hi), None) => {
            let bound = |s: &str| {
                s.trim().parse::<f64>().map_err(|_| {
                    RowbenchError::InvalidConfig(format!(
                        "keys line {}: invalid bound {:?}",
                        line_number, s
                    ))
                })
            };
            let range = ValueRange::new(bound(lo)?, bound(hi)?)?;
            Ok(KeySpec::new(name).with_range(range))
        }
        _ => Err(RowbenchError::InvalidConfig(format!(
            "keys line {}: expected `name` or `name;lo;hi`, got {:?}",
            line_number, line
        ))),
    }
}
