//! Dataset generation and reference aggregation.
//!
//! - [`generate`] streams a deterministic `key=value` dataset from a seed, a
//!   [`KeyUniverse`] and a [`ValueRange`]
//! - [`aggregate`] computes the trusted [`ReferenceResult`](rowbench_core::ReferenceResult)
//!   in one pass with memory proportional to the key count
//! - [`generate_samples`] writes the fixed seed-42 sample sets

pub mod aggregate;
pub mod generator;
pub mod samples;
pub mod stations;
pub mod universe;

pub use aggregate::{
    aggregate, aggregate_file, aggregate_with_summary, inspect_file, DatasetSummary,
    ReferenceAggregator,
};
pub use generator::{
    generate, generate_file, generate_to_string, GenerateStats, Generator, GeneratorConfig,
};
pub use samples::{generate_samples, generate_samples_up_to, SampleFile, SAMPLE_SEED, SAMPLE_SIZES};
pub use universe::{KeySpec, KeyUniverse, ValueRange};
