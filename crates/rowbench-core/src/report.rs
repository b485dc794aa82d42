//! Validation report types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a candidate-side problem.
///
/// The first seven kinds come from output validation, in the order the
/// validator performs its checks. The remaining kinds are recorded by the
/// harness when a candidate never produced a validatable output;
/// `HarnessFailure` means the harness itself failed for that candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueKind {
    FormatError,
    InconsistentStats,
    MissingKey,
    DuplicateKey,
    UnknownKey,
    OrderingError,
    ValueMismatch,
    Timeout,
    OutOfMemory,
    ProcessCrash,
    Cancelled,
    BuildFailure,
    HarnessFailure,
}

impl IssueKind {
    /// Returns true for kinds produced by running the candidate rather than
    /// by checking its output.
    pub fn is_execution(self) -> bool {
        matches!(
            self,
            IssueKind::Timeout
                | IssueKind::OutOfMemory
                | IssueKind::ProcessCrash
                | IssueKind::Cancelled
                | IssueKind::BuildFailure
                | IssueKind::HarnessFailure
        )
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One itemized problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub kind: IssueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u64>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            key: None,
            line_number: None,
            message: message.into(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_line(mut self, line_number: u64) -> Self {
        self.line_number = Some(line_number);
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(line) = self.line_number {
            write!(f, " (line {})", line)?;
        }
        if let Some(key) = &self.key {
            write!(f, " [{}]", key)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Outcome of checking one candidate output against one reference.
///
/// `passed` is true iff `issues` is empty. Reports are never modified after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Builds a report from collected issues.
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self {
            passed: issues.is_empty(),
            issues,
        }
    }

    /// A failed report carrying a single execution issue.
    ///
    /// # Example
    ///
    /// ```
    /// use rowbench_core::{IssueKind, ValidationReport};
    ///
    /// let report = ValidationReport::execution_failure(IssueKind::Timeout, "killed after 100 ms");
    /// assert!(!report.passed);
    /// assert_eq!(report.count(IssueKind::Timeout), 1);
    /// ```
    pub fn execution_failure(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::from_issues(vec![ValidationIssue::new(kind, message)])
    }

    /// Number of issues of one kind.
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    /// Issues of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            return writeln!(f, "PASSED");
        }
        writeln!(f, "FAILED ({} issues)", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}
