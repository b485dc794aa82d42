//! Isolated execution of one candidate process.
//!
//! Each process is spawned as the leader of a new process group. A waiter
//! thread blocks in `wait4` for the exit status and `ru_maxrss`, while the
//! calling thread races that against the wall-clock deadline and a sampling
//! ticker with `select!`. Nothing polls the child for completion, so the
//! measured wall time ends when the leader is reaped.
//!
//! On every tick the resident memory of the whole group is summed (Linux
//! only, from `/proc/<pid>/stat`) and the abort flag is checked. Timeout,
//! memory breach and abort all `SIGKILL` the entire group, and the group is
//! killed once more after the leader exits so no grandchild outlives its run.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rowbench_core::RunMeasurement;

use crate::abort::AbortHandle;

/// Resource limits for one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessLimits {
    pub timeout: Duration,
    pub memory_bytes: u64,
    pub sample_interval: Duration,
}

/// What to spawn and where its standard streams go.
#[derive(Debug, Clone)]
pub struct ProcessRequest<'a> {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub workdir: Option<&'a Path>,
    pub env: &'a BTreeMap<String, String>,
    /// File redirected to stdin, or `/dev/null` when `None`.
    pub stdin: Option<&'a Path>,
    pub stdout: &'a Path,
    pub stderr: &'a Path,
}

/// Everything observed about one process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessOutcome {
    pub wall_time: Duration,
    pub peak_memory_bytes: u64,
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    pub timed_out: bool,
    pub out_of_memory: bool,
    pub cancelled: bool,
}

impl ProcessOutcome {
    /// Outcome recorded when the program could not be started at all.
    pub fn spawn_failure() -> Self {
        Self {
            wall_time: Duration::ZERO,
            peak_memory_bytes: 0,
            exit_code: None,
            signal: None,
            timed_out: false,
            out_of_memory: false,
            cancelled: false,
        }
    }

    /// Returns true if the process exited with code 0 and was not killed.
    pub fn succeeded(&self) -> bool {
        self.to_measurement().is_success()
    }

    pub fn to_measurement(&self) -> RunMeasurement {
        RunMeasurement {
            wall_time_ms: self.wall_time.as_secs_f64() * 1000.0,
            peak_memory_bytes: self.peak_memory_bytes,
            exit_code: self.exit_code,
            signal: self.signal,
            timed_out: self.timed_out,
            out_of_memory: self.out_of_memory,
            cancelled: self.cancelled,
        }
    }
}

/// Runs one process to completion under `limits`.
///
/// I/O errors opening the redirect files are returned as errors. A program
/// that cannot be spawned is not an error: it yields
/// [`ProcessOutcome::spawn_failure`].
#[cfg(unix)]
pub fn run_process(
    request: &ProcessRequest<'_>,
    limits: &ProcessLimits,
    abort: &AbortHandle,
) -> io::Result<ProcessOutcome> {
    unix::run(request, limits, abort)
}

#[cfg(not(unix))]
pub fn run_process(
    _request: &ProcessRequest<'_>,
    _limits: &ProcessLimits,
    _abort: &AbortHandle,
) -> io::Result<ProcessOutcome> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "process isolation requires a unix platform",
    ))
}

#[cfg(unix)]
mod unix {
    use std::fs::File;
    use std::io;
    use std::os::unix::process::CommandExt;
    use std::process::{Command, Stdio};
    use std::thread;
    use std::time::{Duration, Instant};

    use crossbeam::channel::{self, select, Receiver};
    use tracing::warn;

    use super::{ProcessLimits, ProcessOutcome, ProcessRequest};
    use crate::abort::AbortHandle;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kill {
        Timeout,
        Memory,
        Abort,
    }

    struct Exit {
        status: libc::c_int,
        max_rss_bytes: u64,
    }

    pub(super) fn run(
        request: &ProcessRequest<'_>,
        limits: &ProcessLimits,
        abort: &AbortHandle,
    ) -> io::Result<ProcessOutcome> {
        let stdin = match request.stdin {
            Some(path) => Stdio::from(File::open(path)?),
            None => Stdio::null(),
        };
        let mut command = Command::new(&request.program);
        command
            .args(&request.args)
            .envs(request.env)
            .stdin(stdin)
            .stdout(File::create(request.stdout)?)
            .stderr(File::create(request.stderr)?)
            .process_group(0);
        if let Some(dir) = request.workdir {
            command.current_dir(dir);
        }

        let start = Instant::now();
        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(
                    event = "spawn_failed",
                    program = %request.program.display(),
                    error = %e,
                );
                return Ok(ProcessOutcome::spawn_failure());
            }
        };
        let pid = child.id() as libc::pid_t;
        // Reaping happens in wait4 below, never through `child`.
        drop(child);

        let (done_tx, done_rx) = channel::bounded(1);
        let waiter = thread::Builder::new()
            .name(format!("rowbench-wait-{}", pid))
            .spawn(move || {
                let exit = wait_for(pid);
                let _ = done_tx.send((exit, Instant::now()));
            });
        if let Err(e) = waiter {
            kill_group(pid);
            let _ = wait_for(pid);
            return Err(e);
        }

        let deadline: Receiver<Instant> = match start.checked_add(limits.timeout) {
            Some(at) => channel::at(at),
            None => channel::never(),
        };
        let ticker = channel::tick(limits.sample_interval.max(Duration::from_millis(1)));

        let mut peak = 0u64;
        let mut kill: Option<Kill> = None;
        let (exit, exited_at) = loop {
            select! {
                recv(done_rx) -> done => match done {
                    Ok(done) => break done,
                    Err(_) => break (
                        Err(io::Error::other("waiter thread exited without a status")),
                        Instant::now(),
                    ),
                },
                recv(deadline) -> _ => {
                    if kill.is_none() {
                        kill = Some(Kill::Timeout);
                        kill_group(pid);
                    }
                },
                recv(ticker) -> _ => {
                    peak = peak.max(group_rss(pid));
                    if kill.is_none() {
                        if abort.is_aborted() {
                            kill = Some(Kill::Abort);
                            kill_group(pid);
                        } else if peak > limits.memory_bytes {
                            kill = Some(Kill::Memory);
                            kill_group(pid);
                        }
                    }
                },
            }
        };
        kill_group(pid);

        let exit = exit?;
        let (exit_code, signal) = decode_status(exit.status);
        let peak = peak.max(exit.max_rss_bytes);
        // ru_maxrss can reveal a breach the sampler missed.
        if kill.is_none() && peak > limits.memory_bytes {
            kill = Some(Kill::Memory);
        }
        Ok(ProcessOutcome {
            wall_time: exited_at.saturating_duration_since(start),
            peak_memory_bytes: peak,
            exit_code,
            signal,
            timed_out: kill == Some(Kill::Timeout),
            out_of_memory: kill == Some(Kill::Memory),
            cancelled: kill == Some(Kill::Abort),
        })
    }

    fn wait_for(pid: libc::pid_t) -> io::Result<Exit> {
        let mut status: libc::c_int = 0;
        // SAFETY: rusage is plain old data and wait4 only writes into the
        // two out-pointers, which live for the whole call.
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
        loop {
            let reaped = unsafe { libc::wait4(pid, &mut status, 0, &mut usage) };
            if reaped == pid {
                return Ok(Exit {
                    status,
                    max_rss_bytes: max_rss_bytes(usage.ru_maxrss),
                });
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    #[cfg(target_os = "macos")]
    fn max_rss_bytes(ru_maxrss: libc::c_long) -> u64 {
        ru_maxrss.max(0) as u64
    }

    #[cfg(not(target_os = "macos"))]
    fn max_rss_bytes(ru_maxrss: libc::c_long) -> u64 {
        (ru_maxrss.max(0) as u64) * 1024
    }

    fn decode_status(status: libc::c_int) -> (Option<i32>, Option<i32>) {
        if libc::WIFEXITED(status) {
            (Some(libc::WEXITSTATUS(status)), None)
        } else if libc::WIFSIGNALED(status) {
            (None, Some(libc::WTERMSIG(status)))
        } else {
            (None, None)
        }
    }

    fn kill_group(pgid: libc::pid_t) {
        // ESRCH once the group is gone.
        unsafe {
            libc::killpg(pgid, libc::SIGKILL);
        }
    }

    #[cfg(target_os = "linux")]
    fn group_rss(pgid: libc::pid_t) -> u64 {
        let Ok(entries) = std::fs::read_dir("/proc") else {
            return 0;
        };
        let page = page_size();
        entries
            .flatten()
            .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
            .filter_map(|pid| std::fs::read_to_string(format!("/proc/{}/stat", pid)).ok())
            .filter_map(|stat| super::parse_stat(&stat))
            .filter(|&(group, _)| group == pgid)
            .map(|(_, pages)| pages * page)
            .sum()
    }

    #[cfg(not(target_os = "linux"))]
    fn group_rss(_pgid: libc::pid_t) -> u64 {
        0
    }

    #[cfg(target_os = "linux")]
    fn page_size() -> u64 {
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 {
            size as u64
        } else {
            4096
        }
    }
}

/// Extracts `(pgrp, rss pages)` from a `/proc/<pid>/stat` line.
///
/// The command name may contain spaces and parentheses, so fields are
/// counted from the last `)`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_stat(stat: &str) -> Option<(i32, u64)> {
    let rest = &stat[stat.rfind(')')? + 1..];
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let pgrp = fields.get(2)?.parse().ok()?;
    let rss: i64 = fields.get(21)?.parse().ok()?;
    Some((pgrp, rss.max(0) as u64))
}
