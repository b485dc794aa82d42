//! Fake candidate programs.
//!
//! Every script drains stdin first so the harness never sees a broken pipe.
//! Run them as `/bin/sh <script>` rather than executing the file directly: a
//! freshly written executable can fail with `ETXTBSY` while another test
//! thread is forking.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable `/bin/sh` script and returns its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
    let mut permissions = std::fs::metadata(&path).expect("stat script").permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).expect("chmod script");
    path
}

/// A candidate that prints `output` verbatim.
pub fn printing_candidate(dir: &Path, name: &str, output: &str) -> PathBuf {
    let body = format!("cat > /dev/null\ncat <<'ROWBENCH_EOF'\n{}\nROWBENCH_EOF", output.trim_end());
    write_script(dir, name, &body)
}

/// A candidate that sleeps for `seconds` before exiting cleanly.
pub fn sleeping_candidate(dir: &Path, name: &str, seconds: u32) -> PathBuf {
    write_script(dir, name, &format!("cat > /dev/null\nsleep {}", seconds))
}

/// A candidate that exits with `code` and prints nothing.
pub fn failing_candidate(dir: &Path, name: &str, code: i32) -> PathBuf {
    write_script(dir, name, &format!("cat > /dev/null\nexit {}", code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_printing_candidate_runs() {
        let dir = tempfile::tempdir().unwrap();
        let script = printing_candidate(dir.path(), "echo.sh", "A=1.0/1.0/1.0\n");
        let output = Command::new("/bin/sh")
            .arg(&script)
            .stdin(std::process::Stdio::null())
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8(output.stdout).unwrap(), "A=1.0/1.0/1.0\n");
    }

    #[test]
    fn test_failing_candidate_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let script = failing_candidate(dir.path(), "fail.sh", 3);
        let status = Command::new("/bin/sh")
            .arg(&script)
            .stdin(std::process::Stdio::null())
            .status()
            .unwrap();
        assert_eq!(status.code(), Some(3));
    }
}
