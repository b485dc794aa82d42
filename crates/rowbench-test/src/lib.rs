//! Shared test fixtures for rowbench crates.
//!
//! - [`datasets`] - the canonical three-row scenario and small generated inputs
//! - [`scripts`] - `/bin/sh` programs that stand in for candidate submissions
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! rowbench-test = { workspace = true }
//! ```

pub mod datasets;
#[cfg(unix)]
pub mod scripts;

pub use datasets::{
    reference_of, small_dataset, write_file, SCENARIO_INPUT, SCENARIO_REFERENCE,
};
