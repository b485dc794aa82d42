//! Output validation for candidate submissions.
//!
//! A candidate output is checked against a [`ReferenceResult`](rowbench_core::ReferenceResult)
//! in one streaming pass. Every problem is collected rather than stopping at
//! the first, and the report lists issues grouped by check in this order:
//!
//! 1. `FormatError`: the line is not exactly `key=min/mean/max` with
//!    one-decimal values. Such lines take no further part in the checks.
//! 2. `InconsistentStats`: `min <= mean <= max` does not hold.
//! 3. `MissingKey` (in reference order), then `DuplicateKey`.
//! 4. `UnknownKey`: a key the reference does not know.
//! 5. `OrderingError`: only the first descending adjacent pair.
//! 6. `ValueMismatch`: a statistic differs from the reference by more than
//!    epsilon (default `0.05`).

pub mod line;
pub mod validator;

pub use line::{split_line, FormatViolation, OutputLine};
pub use validator::{Validator, DEFAULT_EPSILON};
