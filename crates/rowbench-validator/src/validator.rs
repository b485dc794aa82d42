//! The validator and its single-pass check state.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use rowbench_core::{
    IssueKind, KeyStats, ReferenceResult, Tenths, ValidationIssue, ValidationReport,
};
use tracing::info;

use crate::line::{split_line, FormatViolation};

/// Default tolerance for min/mean/max comparisons.
pub const DEFAULT_EPSILON: f64 = 0.05;

/// Slack for binary representation error on top of epsilon.
const FLOAT_SLACK: f64 = 1e-9;

/// Checks candidate output against a reference.
///
/// # Example
///
/// ```
/// use rowbench_core::{IssueKind, ReferenceResult};
/// use rowbench_validator::Validator;
///
/// let reference = ReferenceResult::parse_str("A=1.0/2.0/3.0\nB=2.0/2.0/2.0\n").unwrap();
/// let report = Validator::new().validate_str("B=2.0/2.0/2.0\nA=1.0/2.0/3.0", &reference);
/// assert!(!report.passed);
/// assert_eq!(report.count(IssueKind::OrderingError), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Validator {
    epsilon: f64,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the numeric tolerance. Negative values are treated as zero.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.max(0.0);
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Validates a stream of candidate output.
    ///
    /// Only I/O failures are errors. Every candidate-side problem becomes an
    /// issue in the report.
    pub fn validate<R: BufRead>(
        &self,
        mut reader: R,
        reference: &ReferenceResult,
    ) -> io::Result<ValidationReport> {
        let mut checks = Checks::new(self.epsilon, reference);
        let mut buffer = Vec::with_capacity(128);
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            checks.raw_line(&buffer);
        }

        Ok(checks.finish())
    }

    /// Validates an in-memory output.
    pub fn validate_str(&self, output: &str, reference: &ReferenceResult) -> ValidationReport {
        let mut checks = Checks::new(self.epsilon, reference);
        for chunk in output.as_bytes().split_inclusive(|&b| b == b'\n') {
            checks.raw_line(chunk);
        }
        checks.finish()
    }

    /// Validates an output file.
    pub fn validate_file(
        &self,
        path: impl AsRef<Path>,
        reference: &ReferenceResult,
    ) -> io::Result<ValidationReport> {
        let file = File::open(path)?;
        self.validate(BufReader::new(file), reference)
    }
}

/// Issues collected per check, concatenated in check order at the end.
struct Checks<'r> {
    epsilon: f64,
    reference: &'r ReferenceResult,
    format: Vec<ValidationIssue>,
    inconsistent: Vec<ValidationIssue>,
    duplicate: Vec<ValidationIssue>,
    unknown: Vec<ValidationIssue>,
    ordering: Option<ValidationIssue>,
    mismatch: Vec<ValidationIssue>,
    seen: HashMap<String, u64>,
    previous: Option<String>,
    line_number: u64,
}

impl<'r> Checks<'r> {
    fn new(epsilon: f64, reference: &'r ReferenceResult) -> Self {
        Self {
            epsilon,
            reference,
            format: Vec::new(),
            inconsistent: Vec::new(),
            duplicate: Vec::new(),
            unknown: Vec::new(),
            ordering: None,
            mismatch: Vec::new(),
            seen: HashMap::with_capacity(reference.len()),
            previous: None,
            line_number: 0,
        }
    }

    /// Checks one line including its terminator, if any.
    fn raw_line(&mut self, chunk: &[u8]) {
        self.line_number += 1;
        let line_number = self.line_number;
        let raw = chunk.strip_suffix(b"\n").unwrap_or(chunk);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        match std::str::from_utf8(raw) {
            Ok(line) => self.line(line_number, line),
            Err(_) => self.format_error(line_number, FormatViolation::NotUtf8, ""),
        }
    }

    fn format_error(&mut self, line_number: u64, violation: FormatViolation, line: &str) {
        let message = if line.is_empty() {
            violation.describe().to_string()
        } else {
            format!("{}: {:?}", violation.describe(), truncate(line))
        };
        self.format
            .push(ValidationIssue::new(IssueKind::FormatError, message).with_line(line_number));
    }

    fn line(&mut self, line_number: u64, line: &str) {
        let parsed = match split_line(line) {
            Ok(parsed) => parsed,
            Err(violation) => return self.format_error(line_number, violation, line),
        };
        let key = parsed.key;
        let reference = self.reference;

        self.consistency(line_number, key, parsed.values);

        let first_occurrence = match self.seen.get(key) {
            Some(&first) => {
                self.duplicate.push(
                    ValidationIssue::new(
                        IssueKind::DuplicateKey,
                        format!("first seen on line {}", first),
                    )
                    .with_key(key)
                    .with_line(line_number),
                );
                false
            }
            None => {
                self.seen.insert(key.to_string(), line_number);
                true
            }
        };

        let expected = reference.get(key);
        if first_occurrence && expected.is_none() {
            self.unknown.push(
                ValidationIssue::new(IssueKind::UnknownKey, "key is not in the reference")
                    .with_key(key)
                    .with_line(line_number),
            );
        }

        if let Some(previous) = &self.previous {
            if self.ordering.is_none() && previous.as_str() > key {
                self.ordering = Some(
                    ValidationIssue::new(
                        IssueKind::OrderingError,
                        format!("{:?} appears after {:?}", key, previous),
                    )
                    .with_key(key)
                    .with_line(line_number),
                );
            }
        }
        self.previous = Some(key.to_string());

        if let (true, Some(expected)) = (first_occurrence, expected) {
            self.compare(line_number, key, expected, parsed.values);
        }
    }

    /// Checks `min <= mean <= max`.
    fn consistency(&mut self, line_number: u64, key: &str, values: [Tenths; 3]) {
        let [min, mean, max] = values;
        if !(min <= mean && mean <= max) {
            self.inconsistent.push(
                ValidationIssue::new(
                    IssueKind::InconsistentStats,
                    format!("expected min <= mean <= max, got {}/{}/{}", min, mean, max),
                )
                .with_key(key)
                .with_line(line_number),
            );
        }
    }

    fn compare(&mut self, line_number: u64, key: &str, expected: &KeyStats, actual: [Tenths; 3]) {
        let tolerance = self.epsilon + FLOAT_SLACK;
        let wanted = [expected.min, expected.mean, expected.max];
        let mismatches: Vec<String> = ["min", "mean", "max"]
            .iter()
            .zip(wanted.iter().zip(actual))
            .filter(|(_, (want, got))| (got.as_f64() - want.as_f64()).abs() > tolerance)
            .map(|(name, (want, got))| format!("{} expected {}, got {}", name, want, got))
            .collect();
        if !mismatches.is_empty() {
            self.mismatch.push(
                ValidationIssue::new(IssueKind::ValueMismatch, mismatches.join("; "))
                    .with_key(key)
                    .with_line(line_number),
            );
        }
    }

    fn finish(self) -> ValidationReport {
        let missing = self
            .reference
            .keys()
            .filter(|key| !self.seen.contains_key(key.as_str()))
            .map(|key| {
                ValidationIssue::new(IssueKind::MissingKey, "key is missing from the output")
                    .with_key(key.as_str())
            })
            .collect::<Vec<_>>();

        let mut issues = self.format;
        issues.extend(self.inconsistent);
        issues.extend(missing);
        issues.extend(self.duplicate);
        issues.extend(self.unknown);
        issues.extend(self.ordering);
        issues.extend(self.mismatch);
        let report = ValidationReport::from_issues(issues);
        info!(
            event = "validate_end",
            lines = self.line_number,
            passed = report.passed,
            issues = report.issues.len(),
        );
        report
    }
}

fn truncate(line: &str) -> &str {
    const MAX: usize = 80;
    if line.len() <= MAX {
        return line;
    }
    let mut end = MAX;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
