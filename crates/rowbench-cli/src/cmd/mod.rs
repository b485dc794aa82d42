pub mod benchmark;
pub mod generate;
pub mod inspect;
pub mod reference;
pub mod samples;
pub mod tournament;
pub mod validate;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;

use rowbench_benchmark::AbortHandle;
use rowbench_core::{ReferenceResult, RowbenchError};

/// Result type shared by every subcommand.
pub type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Loads a reference output file, or aggregates the dataset when no
/// reference file is given.
pub fn load_reference(reference: Option<&Path>, input: Option<&Path>) -> CmdResult<ReferenceResult> {
    match (reference, input) {
        (Some(path), _) => {
            let file = File::open(path)
                .map_err(|e| format!("cannot open reference {}: {e}", path.display()))?;
            Ok(ReferenceResult::parse(BufReader::new(file)).map_err(describe)?)
        }
        (None, Some(input)) => Ok(rowbench_dataset::aggregate_file(input).map_err(describe)?),
        (None, None) => Err("either --reference or --input is required".into()),
    }
}

/// Handle shared by every Ctrl-C handler request; ctrlc allows only one.
static CTRL_C: Mutex<Option<AbortHandle>> = Mutex::new(None);

/// Installs a Ctrl-C handler that aborts the in-flight candidate.
pub fn abort_on_ctrl_c() -> CmdResult<AbortHandle> {
    let mut slot = CTRL_C
        .lock()
        .map_err(|_| "Ctrl+C handler state is poisoned")?;
    if let Some(abort) = slot.as_ref() {
        return Ok(abort.clone());
    }
    let abort = AbortHandle::new();
    let handle = abort.clone();
    ctrlc::set_handler(move || {
        eprintln!("\naborting: killing candidate processes...");
        handle.abort();
    })
    .map_err(|e| format!("failed to set Ctrl+C handler: {e}"))?;
    *slot = Some(abort.clone());
    Ok(abort)
}

/// Renders dataset errors for the terminal; line errors name the line.
pub fn describe(e: RowbenchError) -> Box<dyn std::error::Error> {
    match e {
        RowbenchError::MalformedLine {
            line_number,
            content,
        } => format!("malformed line {line_number}: {content:?}").into(),
        other => Box::new(other),
    }
}
