//! Detached launching of the user's command when a break ends.
//!
//! The command string is handed to the platform shell verbatim, so pipes,
//! redirects and any other shell syntax work. This runs arbitrary code with
//! the user's privileges and must only ever receive the user's own input.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::thread;

use chrono::Local;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::event_log::{EventKind, EventLog};

/// Longest command prefix kept in an output file name.
pub const MAX_NAME_LEN: usize = 60;

/// Numbered variants tried when launches in the same second collide.
const MAX_NAME_ATTEMPTS: usize = 1000;

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w.\-]").expect("valid regex"));

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("cannot create output file {path}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot spawn {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Starts a command without waiting for it. Returns where its output goes.
pub trait Spawn {
    fn spawn_detached(&self, command: &str) -> Result<PathBuf, DispatchError>;
}

/// Runs commands through `sh -c` (or `cmd /C`) in a new session, with
/// stdout and stderr captured into a fresh file under `output_dir`.
#[derive(Debug, Clone)]
pub struct ShellSpawner {
    output_dir: PathBuf,
}

impl ShellSpawner {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_path(&self, command: &str) -> PathBuf {
        let stamp = Local::now().format("%Y%m%dT%H%M%S");
        self.output_dir
            .join(format!("{stamp}_{}.log", sanitize_name(command)))
    }

    /// Create a new output file, never reusing one that already exists.
    /// Collisions get a `-1`, `-2`, ... suffix before the extension.
    fn create_output(&self, command: &str) -> Result<(PathBuf, File), DispatchError> {
        let base = self.output_path(command);
        fs::create_dir_all(&self.output_dir).map_err(|source| DispatchError::OutputFile {
            path: base.clone(),
            source,
        })?;

        let stem = base.with_extension("");
        let mut path = base.clone();
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    path = PathBuf::from(format!("{}-{attempt}.log", stem.display()));
                }
                Err(source) => return Err(DispatchError::OutputFile { path, source }),
            }
        }
        Err(DispatchError::OutputFile {
            path: base,
            source: io::Error::new(io::ErrorKind::AlreadyExists, "no free output file name"),
        })
    }
}

impl Spawn for ShellSpawner {
    fn spawn_detached(&self, command: &str) -> Result<PathBuf, DispatchError> {
        let (path, stdout) = self.create_output(command)?;
        let stderr = stdout.try_clone().map_err(|source| DispatchError::OutputFile {
            path: path.clone(),
            source,
        })?;

        let mut child = shell(command)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|source| DispatchError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let pid = child.id();
        // reap in the background so the child never lingers as a zombie
        thread::spawn(move || {
            let _ = child.wait();
        });

        info!(pid, output = %path.display(), "launched detached command");
        Ok(path)
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    use std::os::unix::process::CommandExt;

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    // SAFETY: setsid is async-signal-safe and touches no parent state.
    unsafe {
        cmd.pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }
    cmd
}

#[cfg(not(unix))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Replace everything but word characters, `.` and `-`, and keep the first
/// [`MAX_NAME_LEN`] characters.
pub fn sanitize_name(command: &str) -> String {
    UNSAFE_NAME_CHARS
        .replace_all(command, "_")
        .chars()
        .take(MAX_NAME_LEN)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No command configured.
    Skipped,
    Launched(PathBuf),
    Failed(String),
}

pub struct CommandDispatcher {
    spawner: Box<dyn Spawn>,
}

impl CommandDispatcher {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self::with_spawner(Box::new(ShellSpawner::new(output_dir)))
    }

    pub fn with_spawner(spawner: Box<dyn Spawn>) -> Self {
        Self { spawner }
    }

    /// Launch `command` if there is one. Never blocks on the child and never
    /// fails; the result is recorded in `log` unless nothing was launched.
    pub fn dispatch(&self, command: Option<&str>, log: &mut dyn EventLog) -> DispatchOutcome {
        let Some(command) = command.filter(|c| !c.trim().is_empty()) else {
            return DispatchOutcome::Skipped;
        };

        match self.spawner.spawn_detached(command) {
            Ok(path) => {
                log.record(
                    EventKind::CmdRunDetached,
                    &format!("{command} -> {}", path.display()),
                );
                DispatchOutcome::Launched(path)
            }
            Err(err) => {
                warn!(error = %err, "command dispatch failed");
                let message = err.to_string();
                log.record(EventKind::CmdError, &message);
                DispatchOutcome::Failed(message)
            }
        }
    }
}
