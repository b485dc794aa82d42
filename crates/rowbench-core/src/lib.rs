//! rowbench core - shared types for the tournament engine
//!
//! This crate provides the data model shared by every stage of the pipeline:
//! - [`Tenths`] fixed-point temperatures and the half-to-even mean rule
//! - [`Measurement`] dataset rows and their line grammar
//! - [`KeyAggregate`] accumulators and the immutable [`ReferenceResult`]
//! - [`ValidationReport`] and its itemized [`ValidationIssue`]s
//! - [`RunMeasurement`], [`RunSummary`] and [`SubmissionResult`], the JSON
//!   records handed to leaderboard tooling
//! - [`RowbenchError`], the tooling-side error taxonomy

pub mod error;
pub mod measurement;
pub mod reference;
pub mod report;
pub mod submission;
pub mod tenths;

pub use error::{Result, RowbenchError};
pub use measurement::{is_valid_key, parse_measurement, Measurement};
pub use reference::{parse_output_line, KeyAggregate, KeyStats, ReferenceResult};
pub use report::{IssueKind, ValidationIssue, ValidationReport};
pub use submission::{RunMeasurement, RunOutcome, RunSummary, SubmissionResult};
pub use tenths::Tenths;
